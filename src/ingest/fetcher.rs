//! Resolves signatures to transaction records in bounded concurrent batches.

use super::ProgressObserver;
use crate::datasource::LedgerSource;
use crate::domain::{CompleteTransaction, SignatureInfo};
use futures::future::join_all;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Records that survived the fetch stage, in input order, plus drop counts.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub transactions: Vec<CompleteTransaction>,
    /// Requests that errored.
    pub failed: usize,
    /// Unknown to the node, or lacking block time or balance metadata.
    pub incomplete: usize,
}

#[derive(Debug, Clone)]
pub struct BatchFetcher {
    batch_size: usize,
}

impl BatchFetcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Fetch details batch by batch; requests inside a batch run concurrently.
    ///
    /// A failing signature only loses its own record.
    pub async fn fetch_all(
        &self,
        source: &dyn LedgerSource,
        signatures: &[SignatureInfo],
        progress: &dyn ProgressObserver,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let batches = signatures.len().div_ceil(self.batch_size);

        for (batch_no, chunk) in signatures.chunks(self.batch_size).enumerate() {
            let results = join_all(
                chunk
                    .iter()
                    .map(|info| source.fetch_transaction(&info.signature)),
            )
            .await;

            for (info, result) in chunk.iter().zip(results) {
                match result {
                    Ok(Some(tx)) => match tx.into_complete() {
                        Some(tx) => outcome.transactions.push(tx),
                        None => outcome.incomplete += 1,
                    },
                    Ok(None) => outcome.incomplete += 1,
                    Err(e) => {
                        progress.on_detail_failed(&info.signature, &e);
                        outcome.failed += 1;
                    }
                }
            }

            progress.on_batch(batch_no + 1, batches, outcome.transactions.len());
        }

        outcome
    }
}

impl Default for BatchFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
