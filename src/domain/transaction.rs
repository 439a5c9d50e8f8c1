//! Ledger records as handed over by a [`crate::datasource::LedgerSource`].

use crate::domain::{Address, BlockTime, Decimal, Signature};
use serde::{Deserialize, Serialize};

/// One entry of a signature page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signature: Signature,
    pub slot: u64,
    pub block_time: Option<BlockTime>,
    /// Transaction failed on-chain. Still fetched; balances are unchanged apart from fees.
    pub failed: bool,
}

impl SignatureInfo {
    pub fn new(signature: Signature, slot: u64) -> Self {
        Self {
            signature,
            slot,
            block_time: None,
            failed: false,
        }
    }
}

/// A token balance entry from a pre- or post-transaction snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Index of the token account in the transaction's account keys.
    pub account_index: usize,
    pub mint: Address,
    /// Wallet owning the token account. Absent on some very old records.
    pub owner: Option<Address>,
    /// Human-scaled amount (already divided by the mint's decimals).
    pub ui_amount: Decimal,
}

/// Balance metadata attached to a confirmed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMeta {
    /// Base-currency balances in smallest units, indexed like `account_keys`.
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
}

/// A fully resolved transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub signature: Signature,
    pub slot: u64,
    pub block_time: Option<BlockTime>,
    pub meta: Option<BalanceMeta>,
    /// Static keys followed by lookup-table loaded keys (writable, then readonly).
    pub account_keys: Vec<Address>,
}

impl ParsedTransaction {
    /// True if the transaction references `account` in its key list.
    pub fn mentions(&self, account: &Address) -> bool {
        self.account_keys.iter().any(|k| k == account)
            || self.meta.as_ref().is_some_and(|m| {
                m.pre_token_balances
                    .iter()
                    .chain(m.post_token_balances.iter())
                    .any(|b| &b.mint == account)
            })
    }

    /// Promote to a [`CompleteTransaction`] if both timestamp and balance metadata are present.
    pub fn into_complete(self) -> Option<CompleteTransaction> {
        let block_time = self.block_time?;
        let meta = self.meta?;
        Some(CompleteTransaction {
            signature: self.signature,
            slot: self.slot,
            block_time,
            meta,
            account_keys: self.account_keys,
        })
    }
}

/// A transaction that passed the completeness filter of the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteTransaction {
    pub signature: Signature,
    pub slot: u64,
    pub block_time: BlockTime,
    pub meta: BalanceMeta,
    pub account_keys: Vec<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(meta: Option<BalanceMeta>, block_time: Option<BlockTime>) -> ParsedTransaction {
        ParsedTransaction {
            signature: Signature::new("sig"),
            slot: 7,
            block_time,
            meta,
            account_keys: vec![Address::new("wallet")],
        }
    }

    #[test]
    fn test_into_complete_requires_block_time() {
        assert!(bare(Some(BalanceMeta::default()), None).into_complete().is_none());
    }

    #[test]
    fn test_into_complete_requires_meta() {
        assert!(bare(None, Some(BlockTime::new(1))).into_complete().is_none());
    }

    #[test]
    fn test_into_complete_keeps_fields() {
        let tx = bare(Some(BalanceMeta::default()), Some(BlockTime::new(1)))
            .into_complete()
            .unwrap();
        assert_eq!(tx.slot, 7);
        assert_eq!(tx.block_time, BlockTime::new(1));
    }

    #[test]
    fn test_mentions_checks_keys_and_mints() {
        let mut tx = bare(Some(BalanceMeta::default()), Some(BlockTime::new(1)));
        assert!(tx.mentions(&Address::new("wallet")));
        assert!(!tx.mentions(&Address::new("mint")));

        tx.meta.as_mut().unwrap().post_token_balances.push(TokenBalance {
            account_index: 0,
            mint: Address::new("mint"),
            owner: None,
            ui_amount: Decimal::zero(),
        });
        assert!(tx.mentions(&Address::new("mint")));
    }
}
