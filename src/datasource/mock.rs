//! Mock ledger source for testing without network calls.

use super::{DataSourceError, LedgerSource};
use crate::domain::{Address, ParsedTransaction, Signature, SignatureInfo};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory ledger. Transactions are kept newest first, as a node would page them.
#[derive(Debug, Default)]
pub struct MockLedgerSource {
    transactions: Vec<ParsedTransaction>,
    missing: HashSet<Signature>,
    failing: HashSet<Signature>,
    fail_page_at: Option<usize>,
    page_requests: AtomicUsize,
    detail_requests: AtomicUsize,
}

impl MockLedgerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction. Call in chronological order; paging returns newest first.
    pub fn with_transaction(mut self, tx: ParsedTransaction) -> Self {
        self.transactions.insert(0, tx);
        self
    }

    pub fn with_transactions(self, txs: Vec<ParsedTransaction>) -> Self {
        txs.into_iter().fold(self, |source, tx| source.with_transaction(tx))
    }

    /// The signature pages normally, but detail lookup returns `None`.
    pub fn with_missing_detail(mut self, signature: Signature) -> Self {
        self.missing.insert(signature);
        self
    }

    /// The signature pages normally, but detail lookup errors.
    pub fn with_failing_detail(mut self, signature: Signature) -> Self {
        self.failing.insert(signature);
        self
    }

    /// The n-th (0-based) signature page request fails.
    pub fn with_page_failure_at(mut self, request: usize) -> Self {
        self.fail_page_at = Some(request);
        self
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub fn detail_requests(&self) -> usize {
        self.detail_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for MockLedgerSource {
    async fn fetch_signatures(
        &self,
        address: &Address,
        before: Option<&Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, DataSourceError> {
        let request = self.page_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_page_at == Some(request) {
            return Err(DataSourceError::NetworkError("injected page failure".to_string()));
        }

        let relevant = self.transactions.iter().filter(|tx| tx.mentions(address));
        let start = match before {
            Some(cursor) => {
                let mut seen = false;
                let older: Vec<_> = relevant
                    .skip_while(|tx| {
                        if seen {
                            return false;
                        }
                        seen = &tx.signature == cursor;
                        true
                    })
                    .collect();
                // Unknown cursor: nothing is older than it.
                if !seen {
                    return Ok(Vec::new());
                }
                older
            }
            None => relevant.collect(),
        };

        Ok(start
            .into_iter()
            .take(limit)
            .map(|tx| SignatureInfo {
                signature: tx.signature.clone(),
                slot: tx.slot,
                block_time: tx.block_time,
                failed: false,
            })
            .collect())
    }

    async fn fetch_transaction(
        &self,
        signature: &Signature,
    ) -> Result<Option<ParsedTransaction>, DataSourceError> {
        self.detail_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(signature) {
            return Err(DataSourceError::HttpError {
                status: 503,
                message: "injected detail failure".to_string(),
            });
        }
        if self.missing.contains(signature) {
            return Ok(None);
        }
        Ok(self
            .transactions
            .iter()
            .find(|tx| &tx.signature == signature)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BalanceMeta, BlockTime};

    fn make_tx(sig: &str, time: i64, keys: &[&str]) -> ParsedTransaction {
        ParsedTransaction {
            signature: Signature::new(sig),
            slot: time as u64,
            block_time: Some(BlockTime::new(time)),
            meta: Some(BalanceMeta::default()),
            account_keys: keys.iter().map(|k| Address::new(*k)).collect(),
        }
    }

    fn source() -> MockLedgerSource {
        MockLedgerSource::new().with_transactions(vec![
            make_tx("a", 1, &["w"]),
            make_tx("b", 2, &["w", "x"]),
            make_tx("c", 3, &["w"]),
        ])
    }

    #[tokio::test]
    async fn test_pages_newest_first() {
        let mock = source();
        let page = mock.fetch_signatures(&Address::new("w"), None, 2).await.unwrap();
        let sigs: Vec<_> = page.iter().map(|s| s.signature.as_str()).collect();
        assert_eq!(sigs, vec!["c", "b"]);

        let page = mock
            .fetch_signatures(&Address::new("w"), Some(&Signature::new("b")), 2)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].signature.as_str(), "a");
    }

    #[tokio::test]
    async fn test_pages_only_mentioning_transactions() {
        let mock = source();
        let page = mock.fetch_signatures(&Address::new("x"), None, 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].signature.as_str(), "b");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mock = source()
            .with_page_failure_at(0)
            .with_failing_detail(Signature::new("a"))
            .with_missing_detail(Signature::new("b"));

        assert!(mock.fetch_signatures(&Address::new("w"), None, 10).await.is_err());
        assert!(mock.fetch_signatures(&Address::new("w"), None, 10).await.is_ok());
        assert!(mock.fetch_transaction(&Signature::new("a")).await.is_err());
        assert_eq!(mock.fetch_transaction(&Signature::new("b")).await.unwrap(), None);
        assert!(mock.fetch_transaction(&Signature::new("c")).await.unwrap().is_some());
        assert_eq!(mock.page_requests(), 2);
        assert_eq!(mock.detail_requests(), 3);
    }
}
