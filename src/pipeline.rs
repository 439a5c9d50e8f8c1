//! Wires the stages together: paginate -> fetch -> classify -> account.

use crate::config::Config;
use crate::datasource::LedgerSource;
use crate::domain::{Address, CompleteTransaction, Trade};
use crate::engine::{FifoAccountant, HolderCollector, Lot, Realization, TradeClassifier, WalletPnl};
use crate::ingest::{BatchFetcher, HistoryPaginator, ProgressObserver, TracingProgress};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// What the I/O stages saw, for judging how complete a result is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub signatures: usize,
    /// Pagination stopped on an error; older history is missing.
    pub partial_history: bool,
    pub transactions: usize,
    pub failed_fetches: usize,
    pub incomplete_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub wallet: Address,
    pub mint: Address,
    pub pnl: WalletPnl,
    /// Oldest first.
    pub trades: Vec<Trade>,
    pub open_lots: Vec<Lot>,
    pub realizations: Vec<Realization>,
    pub stats: IngestStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolderReport {
    pub mint: Address,
    pub holders: Vec<Address>,
    pub stats: IngestStats,
}

#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn LedgerSource>,
    paginator: HistoryPaginator,
    fetcher: BatchFetcher,
    progress: Arc<dyn ProgressObserver>,
}

impl Analyzer {
    pub fn new(source: Arc<dyn LedgerSource>, page_size: usize, batch_size: usize) -> Self {
        Self {
            source,
            paginator: HistoryPaginator::new(page_size),
            fetcher: BatchFetcher::new(batch_size),
            progress: Arc::new(TracingProgress),
        }
    }

    pub fn from_config(source: Arc<dyn LedgerSource>, config: &Config) -> Self {
        Self::new(source, config.page_size, config.batch_size)
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Walk the history of `account` and resolve every transaction, newest first.
    pub async fn load_history(&self, account: &Address) -> (Vec<CompleteTransaction>, IngestStats) {
        let history = self
            .paginator
            .collect(self.source.as_ref(), account, self.progress.as_ref())
            .await;
        let outcome = self
            .fetcher
            .fetch_all(self.source.as_ref(), &history.signatures, self.progress.as_ref())
            .await;

        let stats = IngestStats {
            signatures: history.signatures.len(),
            partial_history: history.is_partial(),
            transactions: outcome.transactions.len(),
            failed_fetches: outcome.failed,
            incomplete_records: outcome.incomplete,
        };
        info!(
            account = %account,
            signatures = stats.signatures,
            transactions = stats.transactions,
            partial = stats.partial_history,
            "History loaded"
        );
        (outcome.transactions, stats)
    }

    /// Realized FIFO PnL of `wallet` trading `mint` against the base currency.
    pub async fn analyze_wallet(
        &self,
        account: &Address,
        wallet: &Address,
        mint: &Address,
        base_decimals: u32,
    ) -> WalletReport {
        let (transactions, stats) = self.load_history(account).await;
        let classifier = TradeClassifier::new(wallet.clone(), mint.clone(), base_decimals);
        let trades = classifier.classify_all(&transactions);

        let mut accountant = FifoAccountant::new();
        accountant.process_all(&trades);
        let (pnl, open_lots, realizations) = accountant.into_outputs();

        info!(
            wallet = %wallet,
            trades = trades.len(),
            realized_pnl = %pnl.realized_pnl,
            "Wallet analyzed"
        );

        WalletReport {
            wallet: wallet.clone(),
            mint: mint.clone(),
            pnl,
            trades,
            open_lots,
            realizations,
            stats,
        }
    }

    /// Distinct owners of `mint` seen across the history of `account`.
    pub async fn discover_holders(&self, account: &Address, mint: &Address) -> HolderReport {
        let (transactions, stats) = self.load_history(account).await;
        let mut collector = HolderCollector::new(mint.clone());
        collector.observe_all(&transactions);
        info!(mint = %mint, holders = collector.len(), "Holders collected");

        HolderReport {
            mint: mint.clone(),
            holders: collector.into_sorted(),
            stats,
        }
    }
}
