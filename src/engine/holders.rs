//! Distinct holder collection for the address-discovery run.

use crate::domain::{Address, CompleteTransaction};
use std::collections::BTreeSet;

/// Collects every owner seen holding `mint` in a post-transaction snapshot.
#[derive(Debug, Clone)]
pub struct HolderCollector {
    mint: Address,
    holders: BTreeSet<Address>,
}

impl HolderCollector {
    pub fn new(mint: Address) -> Self {
        Self {
            mint,
            holders: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, tx: &CompleteTransaction) {
        let owners = tx
            .meta
            .post_token_balances
            .iter()
            .filter(|b| b.mint == self.mint)
            .filter_map(|b| b.owner.clone());
        self.holders.extend(owners);
    }

    pub fn observe_all(&mut self, txs: &[CompleteTransaction]) {
        for tx in txs {
            self.observe(tx);
        }
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Holders in lexical order.
    pub fn into_sorted(self) -> Vec<Address> {
        self.holders.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BalanceMeta, BlockTime, Decimal, Signature, TokenBalance};

    fn tx(sig: &str, balances: &[(&str, Option<&str>)]) -> CompleteTransaction {
        CompleteTransaction {
            signature: Signature::new(sig),
            slot: 1,
            block_time: BlockTime::new(1),
            meta: BalanceMeta {
                post_token_balances: balances
                    .iter()
                    .enumerate()
                    .map(|(i, (mint, owner))| TokenBalance {
                        account_index: i,
                        mint: Address::new(*mint),
                        owner: owner.map(Address::new),
                        ui_amount: Decimal::zero(),
                    })
                    .collect(),
                ..Default::default()
            },
            account_keys: vec![],
        }
    }

    #[test]
    fn test_collects_distinct_sorted_owners() {
        let mut collector = HolderCollector::new(Address::new("MINT"));
        collector.observe_all(&[
            tx("a", &[("MINT", Some("carol")), ("MINT", Some("alice"))]),
            tx("b", &[("MINT", Some("alice")), ("OTHER", Some("dave")), ("MINT", None)]),
            tx("c", &[("MINT", Some("bob"))]),
        ]);

        assert_eq!(collector.len(), 3);
        let holders: Vec<_> = collector.into_sorted().into_iter().map(|a| a.0).collect();
        assert_eq!(holders, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_empty_when_no_balances() {
        let mut collector = HolderCollector::new(Address::new("MINT"));
        collector.observe(&tx("a", &[]));
        assert!(collector.is_empty());
    }
}
