pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;

pub use config::{Config, RunMode};
pub use datasource::{DataSourceError, LedgerSource, MockLedgerSource, SolanaRpcSource};
pub use domain::{
    Address, BalanceDelta, BlockTime, CompleteTransaction, Currency, Decimal, ParsedTransaction,
    Side, Signature, Trade,
};
pub use engine::{FifoAccountant, Lot, Realization, TradeClassifier, WalletPnl};
pub use error::AppError;
pub use pipeline::{Analyzer, HolderReport, IngestStats, WalletReport};
