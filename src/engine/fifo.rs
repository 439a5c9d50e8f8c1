use crate::domain::{BlockTime, Decimal, Side, Signature, Trade};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// An open buy position awaiting matching against later sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Signature of the buy that opened the lot.
    pub signature: Signature,
    /// Unconsumed quantity. Shrinks as sells consume the lot.
    pub quantity: Decimal,
    /// Unit price paid.
    pub cost_basis: Decimal,
    pub block_time: BlockTime,
}

/// One lot consumption caused by a sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realization {
    pub buy_signature: Signature,
    pub sell_signature: Signature,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub sell_price: Decimal,
    /// quantity * (sell_price - cost_basis)
    pub pnl: Decimal,
}

/// Summary of one wallet's trading in one token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletPnl {
    pub total_bought_quote: Decimal,
    pub total_sold_quote: Decimal,
    pub realized_pnl: Decimal,
    pub remaining_token_quantity: Decimal,
    /// Sold quantity that found no open lot (bought outside the observed history).
    pub unmatched_sell_quantity: Decimal,
    pub trade_count: usize,
    pub open_lots: usize,
}

/// FIFO lot accountant. Trades must be fed oldest first.
#[derive(Debug, Default)]
pub struct FifoAccountant {
    lots: VecDeque<Lot>,
    realizations: Vec<Realization>,
    pnl: WalletPnl,
}

impl FifoAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_trade(&mut self, trade: &Trade) {
        self.pnl.trade_count += 1;
        match trade.side {
            Side::Buy => self.handle_buy(trade),
            Side::Sell => self.handle_sell(trade),
        }
    }

    pub fn process_all<'a>(&mut self, trades: impl IntoIterator<Item = &'a Trade>) {
        for trade in trades {
            self.process_trade(trade);
        }
    }

    fn handle_buy(&mut self, trade: &Trade) {
        self.lots.push_back(Lot {
            signature: trade.signature.clone(),
            quantity: trade.token_amount,
            cost_basis: trade.unit_price,
            block_time: trade.block_time,
        });
        self.pnl.total_bought_quote += trade.quote_amount;
        self.pnl.remaining_token_quantity += trade.token_amount;
    }

    /// Consume lots oldest first. Excess beyond the open lots is dropped from
    /// matching and only counted in `unmatched_sell_quantity`.
    fn handle_sell(&mut self, trade: &Trade) {
        let sell_price = trade.unit_price;
        let mut to_sell = trade.token_amount;

        while to_sell.is_positive() {
            let Some(lot) = self.lots.front_mut() else {
                break;
            };

            let consumed = lot.quantity.min(to_sell);
            let pnl = consumed * (sell_price - lot.cost_basis);
            self.realizations.push(Realization {
                buy_signature: lot.signature.clone(),
                sell_signature: trade.signature.clone(),
                quantity: consumed,
                cost_basis: lot.cost_basis,
                sell_price,
                pnl,
            });
            self.pnl.realized_pnl += pnl;
            self.pnl.remaining_token_quantity -= consumed;
            to_sell -= consumed;

            if lot.quantity <= consumed {
                self.lots.pop_front();
            } else {
                lot.quantity -= consumed;
            }
        }

        if to_sell.is_positive() {
            warn!(
                signature = %trade.signature,
                unmatched = %to_sell,
                "Sell exceeds open lots, excess left unmatched"
            );
            self.pnl.unmatched_sell_quantity += to_sell;
        }

        self.pnl.total_sold_quote += trade.quote_amount;
    }

    /// Open lots, oldest first.
    pub fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    pub fn realizations(&self) -> &[Realization] {
        &self.realizations
    }

    /// Current totals.
    pub fn summary(&self) -> WalletPnl {
        WalletPnl {
            open_lots: self.lots.len(),
            ..self.pnl.clone()
        }
    }

    pub fn into_outputs(self) -> (WalletPnl, Vec<Lot>, Vec<Realization>) {
        let summary = self.summary();
        (summary, self.lots.into(), self.realizations)
    }
}
