//! Domain types and determinism layer.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: BlockTime, Address, Signature, Side, Currency
//! - Ledger records and the deltas/trades derived from them
//! - Stable trade ordering for deterministic processing

pub mod decimal;
pub mod ordering;
pub mod primitives;
pub mod trade;
pub mod transaction;

pub use decimal::Decimal;
pub use ordering::{sort_trades_chronological, TradeOrderingKey};
pub use primitives::{Address, BlockTime, Currency, Side, Signature};
pub use trade::{BalanceDelta, Trade};
pub use transaction::{
    BalanceMeta, CompleteTransaction, ParsedTransaction, SignatureInfo, TokenBalance,
};
