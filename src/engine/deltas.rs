//! Signed balance changes from pre/post snapshots of one transaction.

use crate::domain::{Address, BalanceDelta, CompleteTransaction, Currency, Decimal, TokenBalance};

/// Lamports per SOL, as a power of ten.
pub const LAMPORT_DECIMALS: u32 = 9;

/// Balances keyed by owner in first-seen order. Repeated owners are summed.
#[derive(Debug, Default)]
struct OwnerBalances(Vec<(Address, Decimal)>);

impl OwnerBalances {
    fn add(&mut self, owner: &Address, amount: Decimal) {
        match self.0.iter_mut().find(|(o, _)| o == owner) {
            Some((_, total)) => *total += amount,
            None => self.0.push((owner.clone(), amount)),
        }
    }

    fn get(&self, owner: &Address) -> Option<Decimal> {
        self.0.iter().find(|(o, _)| o == owner).map(|(_, a)| *a)
    }

    /// post - pre for every owner in `post`; zero results are dropped.
    fn diff(post: &OwnerBalances, pre: &OwnerBalances, currency: Currency) -> Vec<BalanceDelta> {
        post.0
            .iter()
            .filter_map(|(owner, post_amount)| {
                let amount = *post_amount - pre.get(owner).unwrap_or_default();
                (!amount.is_zero()).then(|| BalanceDelta {
                    owner: owner.clone(),
                    currency,
                    amount,
                })
            })
            .collect()
    }
}

fn token_balances(balances: &[TokenBalance], mint: &Address) -> OwnerBalances {
    let mut grouped = OwnerBalances::default();
    for balance in balances.iter().filter(|b| &b.mint == mint) {
        if let Some(owner) = &balance.owner {
            grouped.add(owner, balance.ui_amount);
        }
    }
    grouped
}

fn base_balances(
    balances: &[u64],
    account_keys: &[Address],
    decimals: u32,
) -> Option<OwnerBalances> {
    let mut grouped = OwnerBalances::default();
    for (key, raw) in account_keys.iter().zip(balances) {
        grouped.add(key, Decimal::from_base_units(i128::from(*raw), decimals).ok()?);
    }
    Some(grouped)
}

/// Diff the snapshots of `tx` into token deltas for `mint` and base-currency deltas.
///
/// Token deltas come first, then base deltas in account-key order.
/// Owners absent from the post snapshot are not reported; owners absent from
/// the pre snapshot start from zero. Returns no base deltas if `base_decimals`
/// exceeds the decimal scale.
pub fn extract_deltas(
    tx: &CompleteTransaction,
    mint: &Address,
    base_decimals: u32,
) -> Vec<BalanceDelta> {
    let meta = &tx.meta;

    let token_pre = token_balances(&meta.pre_token_balances, mint);
    let token_post = token_balances(&meta.post_token_balances, mint);
    let mut deltas = OwnerBalances::diff(&token_post, &token_pre, Currency::Token);

    let base_pre = base_balances(&meta.pre_balances, &tx.account_keys, base_decimals);
    let base_post = base_balances(&meta.post_balances, &tx.account_keys, base_decimals);
    if let (Some(pre), Some(post)) = (base_pre, base_post) {
        deltas.extend(OwnerBalances::diff(&post, &pre, Currency::Base));
    }

    deltas
}
