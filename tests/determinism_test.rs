//! Determinism: the same ledger analyzed twice gives byte-identical output.

use std::sync::Arc;
use tokenpnl::datasource::MockLedgerSource;
use tokenpnl::domain::{BalanceMeta, TokenBalance};
use tokenpnl::ingest::NoopProgress;
use tokenpnl::report::render_summary;
use tokenpnl::{Address, Analyzer, BlockTime, Decimal, ParsedTransaction, Signature};

const WALLET: &str = "wallet";
const MINT: &str = "mint";

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

/// A swap with awkward fractional amounts. Several share a block time.
fn swap(
    n: i64,
    token_pre: &str,
    token_post: &str,
    lamports_pre: u64,
    lamports_post: u64,
) -> ParsedTransaction {
    let balance = |amount: &str| TokenBalance {
        account_index: 1,
        mint: Address::new(MINT),
        owner: Some(Address::new(WALLET)),
        ui_amount: d(amount),
    };
    ParsedTransaction {
        signature: Signature::new(format!("sig{:03}", n)),
        slot: 1_000 + n as u64,
        block_time: Some(BlockTime::new(1_700_000_000 + n / 3)),
        meta: Some(BalanceMeta {
            pre_balances: vec![lamports_pre],
            post_balances: vec![lamports_post],
            pre_token_balances: vec![balance(token_pre)],
            post_token_balances: vec![balance(token_post)],
        }),
        account_keys: vec![Address::new(WALLET)],
    }
}

fn ledger() -> MockLedgerSource {
    let mut txs = Vec::new();
    let mut tokens = d("0");
    let mut lamports: u64 = 500_000_000_000;
    for n in 0..60i64 {
        let pre_tokens = tokens;
        let pre_lamports = lamports;
        if n % 3 == 2 {
            let qty = Decimal::new((tokens * d("0.37")).inner().round_dp(6));
            tokens -= qty;
            lamports += 123_456_789 + n as u64 * 7;
        } else {
            tokens += d("1234.567891") + d(&n.to_string());
            lamports -= 98_765_431 + n as u64 * 11;
        }
        txs.push(swap(
            n,
            &pre_tokens.to_string(),
            &tokens.to_string(),
            pre_lamports,
            lamports,
        ));
    }
    MockLedgerSource::new().with_transactions(txs)
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let run = || async {
        let analyzer =
            Analyzer::new(Arc::new(ledger()), 7, 5).with_progress(Arc::new(NoopProgress));
        analyzer
            .analyze_wallet(&Address::new(WALLET), &Address::new(WALLET), &Address::new(MINT), 9)
            .await
    };

    let first = run().await;
    let second = run().await;

    assert_eq!(first.trades, second.trades);
    assert_eq!(first.pnl, second.pnl);
    assert_eq!(first.realizations, second.realizations);
    assert_eq!(
        render_summary(&first).unwrap(),
        render_summary(&second).unwrap()
    );
    assert_eq!(first.trades.len(), 60);
}

#[tokio::test]
async fn test_trades_are_chronological() {
    let analyzer =
        Analyzer::new(Arc::new(ledger()), 1000, 100).with_progress(Arc::new(NoopProgress));
    let report = analyzer
        .analyze_wallet(&Address::new(WALLET), &Address::new(WALLET), &Address::new(MINT), 9)
        .await;

    let sigs: Vec<_> = report.trades.iter().map(|t| t.signature.as_str().to_string()).collect();
    let mut sorted = sigs.clone();
    sorted.sort();
    assert_eq!(sigs, sorted);
}

#[tokio::test]
async fn test_bookkeeping_identities_hold() {
    let analyzer =
        Analyzer::new(Arc::new(ledger()), 1000, 100).with_progress(Arc::new(NoopProgress));
    let report = analyzer
        .analyze_wallet(&Address::new(WALLET), &Address::new(WALLET), &Address::new(MINT), 9)
        .await;

    let bought: Decimal = report
        .trades
        .iter()
        .filter(|t| t.side == tokenpnl::Side::Buy)
        .map(|t| t.quote_amount)
        .sum();
    let sold: Decimal = report
        .trades
        .iter()
        .filter(|t| t.side == tokenpnl::Side::Sell)
        .map(|t| t.quote_amount)
        .sum();
    assert_eq!(report.pnl.total_bought_quote, bought);
    assert_eq!(report.pnl.total_sold_quote, sold);

    let bought_qty: Decimal = report
        .trades
        .iter()
        .filter(|t| t.side == tokenpnl::Side::Buy)
        .map(|t| t.token_amount)
        .sum();
    let matched_qty: Decimal = report.realizations.iter().map(|r| r.quantity).sum();
    assert_eq!(report.pnl.remaining_token_quantity, bought_qty - matched_qty);
    assert!(!report.pnl.remaining_token_quantity.is_negative());

    let open_qty: Decimal = report.open_lots.iter().map(|l| l.quantity).sum();
    assert_eq!(open_qty, report.pnl.remaining_token_quantity);
}
