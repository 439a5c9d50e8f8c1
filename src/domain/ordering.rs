//! Stable trade ordering for deterministic processing.

use crate::domain::Trade;

/// Stable ordering key for trades.
///
/// Ordering: block_time -> slot. Ties keep their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TradeOrderingKey {
    /// Block time in seconds (primary sort).
    pub block_time: i64,
    /// Slot (secondary sort).
    pub slot: u64,
}

impl TradeOrderingKey {
    pub fn from_trade(trade: &Trade) -> Self {
        TradeOrderingKey {
            block_time: trade.block_time.as_secs(),
            slot: trade.slot,
        }
    }
}

/// Put trades collected in newest-first fetch order into oldest-first order.
///
/// Reversing first means trades sharing a slot come out in on-ledger order.
pub fn sort_trades_chronological(trades: &mut [Trade]) {
    trades.reverse();
    trades.sort_by_key(TradeOrderingKey::from_trade);
}
