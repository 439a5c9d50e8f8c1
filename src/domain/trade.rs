//! Balance deltas and the trades synthesized from them.

use crate::domain::{Address, BlockTime, Currency, Decimal, Side, Signature};
use serde::{Deserialize, Serialize};

/// Signed change of one owner's balance within one transaction. Never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub owner: Address,
    pub currency: Currency,
    /// post - pre
    pub amount: Decimal,
}

/// A directional swap of the target token against the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub signature: Signature,
    pub side: Side,
    /// Quantity of the token bought or sold. Always positive.
    pub token_amount: Decimal,
    /// Base currency paid or received. Always positive.
    pub quote_amount: Decimal,
    /// quote_amount / token_amount
    pub unit_price: Decimal,
    pub block_time: BlockTime,
    pub slot: u64,
}

impl Trade {
    /// Build a trade, deriving the unit price.
    ///
    /// Returns `None` when either amount is not strictly positive.
    pub fn new(
        signature: Signature,
        side: Side,
        token_amount: Decimal,
        quote_amount: Decimal,
        block_time: BlockTime,
        slot: u64,
    ) -> Option<Self> {
        if !token_amount.is_positive() || !quote_amount.is_positive() {
            return None;
        }
        let unit_price = quote_amount.checked_div(token_amount)?;
        Some(Trade {
            signature,
            side,
            token_amount,
            quote_amount,
            unit_price,
            block_time,
            slot,
        })
    }
}
