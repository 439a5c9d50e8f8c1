//! Pairs a wallet's token delta with a base-currency delta into a trade.

use super::deltas::extract_deltas;
use crate::domain::{
    sort_trades_chronological, Address, BalanceDelta, CompleteTransaction, Currency, Side, Trade,
};

/// Classifies transactions of one wallet against one token mint.
///
/// Multi-hop routes (token swapped through an intermediate asset) may be
/// skipped or priced off the wrong leg; only a token delta paired with a
/// base-currency delta is recognized.
#[derive(Debug, Clone)]
pub struct TradeClassifier {
    wallet: Address,
    mint: Address,
    base_decimals: u32,
}

impl TradeClassifier {
    pub fn new(wallet: Address, mint: Address, base_decimals: u32) -> Self {
        Self {
            wallet,
            mint,
            base_decimals,
        }
    }

    /// Classify one transaction. `None` means it is not a trade of this wallet.
    pub fn classify(&self, tx: &CompleteTransaction) -> Option<Trade> {
        let deltas = extract_deltas(tx, &self.mint, self.base_decimals);

        let token = deltas
            .iter()
            .find(|d| d.currency == Currency::Token && d.owner == self.wallet)?;
        let quote = self.pick_base_delta(&deltas)?;

        let side = if token.amount.is_positive() {
            Side::Buy
        } else {
            Side::Sell
        };

        Trade::new(
            tx.signature.clone(),
            side,
            token.amount.abs(),
            quote.amount.abs(),
            tx.block_time,
            tx.slot,
        )
    }

    /// The wallet's own base delta if it has one, else the first non-zero base delta.
    fn pick_base_delta<'a>(&self, deltas: &'a [BalanceDelta]) -> Option<&'a BalanceDelta> {
        let mut base = deltas.iter().filter(|d| d.currency == Currency::Base);
        base.clone()
            .find(|d| d.owner == self.wallet)
            .or_else(|| base.next())
    }

    /// Classify a batch fetched newest-first and return trades oldest-first.
    pub fn classify_all(&self, txs: &[CompleteTransaction]) -> Vec<Trade> {
        let mut trades: Vec<Trade> = txs.iter().filter_map(|tx| self.classify(tx)).collect();
        sort_trades_chronological(&mut trades);
        trades
    }
}
