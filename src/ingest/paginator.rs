//! Backward walk over an address's signature index.

use super::ProgressObserver;
use crate::datasource::{DataSourceError, LedgerSource};
use crate::domain::{Address, Signature, SignatureInfo};
use std::collections::HashSet;

/// Largest page `getSignaturesForAddress` serves.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Signatures collected for one address, newest first.
#[derive(Debug, Default)]
pub struct History {
    pub signatures: Vec<SignatureInfo>,
    /// Set when a page request failed and the walk stopped early.
    pub truncated_by: Option<DataSourceError>,
}

impl History {
    pub fn is_partial(&self) -> bool {
        self.truncated_by.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryPaginator {
    page_size: usize,
}

impl HistoryPaginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Page backward from the newest signature until an empty page.
    ///
    /// A failed request ends the walk; everything gathered so far is returned.
    /// A page that adds nothing new also ends it, so a misbehaving cursor cannot loop.
    pub async fn collect(
        &self,
        source: &dyn LedgerSource,
        address: &Address,
        progress: &dyn ProgressObserver,
    ) -> History {
        let mut history = History::default();
        let mut seen: HashSet<Signature> = HashSet::new();
        let mut cursor: Option<Signature> = None;
        let mut page_no = 0usize;

        loop {
            let page = match source
                .fetch_signatures(address, cursor.as_ref(), self.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    progress.on_pagination_truncated(history.signatures.len(), &e);
                    history.truncated_by = Some(e);
                    break;
                }
            };

            let Some(last) = page.last().map(|info| info.signature.clone()) else {
                break;
            };

            let page_len = page.len();
            let before = history.signatures.len();
            for info in page {
                if seen.insert(info.signature.clone()) {
                    history.signatures.push(info);
                }
            }

            page_no += 1;
            progress.on_page(page_no, page_len, history.signatures.len());

            if history.signatures.len() == before
                || cursor.as_ref() == Some(&last)
                || last.as_str().is_empty()
            {
                break;
            }
            cursor = Some(last);
        }

        history
    }
}

impl Default for HistoryPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MockLedgerSource;
    use crate::domain::{BalanceMeta, BlockTime, ParsedTransaction};
    use crate::ingest::NoopProgress;
    use async_trait::async_trait;

    fn make_tx(n: i64) -> ParsedTransaction {
        ParsedTransaction {
            signature: Signature::new(format!("sig{}", n)),
            slot: n as u64,
            block_time: Some(BlockTime::new(n)),
            meta: Some(BalanceMeta::default()),
            account_keys: vec![Address::new("wallet")],
        }
    }

    fn source(n: i64) -> MockLedgerSource {
        MockLedgerSource::new().with_transactions((1..=n).map(make_tx).collect())
    }

    #[tokio::test]
    async fn test_collects_all_pages_newest_first() {
        let mock = source(7);
        let history = HistoryPaginator::new(3)
            .collect(&mock, &Address::new("wallet"), &NoopProgress)
            .await;

        assert!(!history.is_partial());
        let sigs: Vec<_> = history.signatures.iter().map(|s| s.signature.as_str()).collect();
        assert_eq!(sigs, vec!["sig7", "sig6", "sig5", "sig4", "sig3", "sig2", "sig1"]);
        // 3 + 3 + 1, then the terminating empty page.
        assert_eq!(mock.page_requests(), 4);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let mock = MockLedgerSource::new();
        let history = HistoryPaginator::default()
            .collect(&mock, &Address::new("wallet"), &NoopProgress)
            .await;
        assert!(history.signatures.is_empty());
        assert_eq!(mock.page_requests(), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_partial_history() {
        let mock = source(7).with_page_failure_at(1);
        let history = HistoryPaginator::new(3)
            .collect(&mock, &Address::new("wallet"), &NoopProgress)
            .await;

        assert!(history.is_partial());
        assert_eq!(history.signatures.len(), 3);
        assert_eq!(history.signatures[0].signature.as_str(), "sig7");
    }

    /// Ignores the cursor and serves the same page forever.
    #[derive(Debug)]
    struct StuckSource;

    #[async_trait]
    impl LedgerSource for StuckSource {
        async fn fetch_signatures(
            &self,
            _address: &Address,
            _before: Option<&Signature>,
            _limit: usize,
        ) -> Result<Vec<SignatureInfo>, DataSourceError> {
            Ok(vec![
                SignatureInfo::new(Signature::new("x"), 2),
                SignatureInfo::new(Signature::new("y"), 1),
            ])
        }

        async fn fetch_transaction(
            &self,
            _signature: &Signature,
        ) -> Result<Option<ParsedTransaction>, DataSourceError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_repeated_cursor_terminates() {
        let history = HistoryPaginator::new(2)
            .collect(&StuckSource, &Address::new("wallet"), &NoopProgress)
            .await;
        assert_eq!(history.signatures.len(), 2);
        assert!(!history.is_partial());
    }

    /// Ends its first page with a blank signature and rejects a blank cursor.
    #[derive(Debug, Default)]
    struct BlankTailSource {
        requests: std::sync::Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl LedgerSource for BlankTailSource {
        async fn fetch_signatures(
            &self,
            _address: &Address,
            before: Option<&Signature>,
            _limit: usize,
        ) -> Result<Vec<SignatureInfo>, DataSourceError> {
            self.requests
                .lock()
                .unwrap()
                .push(before.map(|s| s.as_str().to_string()));
            match before {
                None => Ok(vec![
                    SignatureInfo::new(Signature::new("a"), 2),
                    SignatureInfo::new(Signature::new(""), 1),
                ]),
                Some(_) => Err(DataSourceError::RpcError {
                    code: -32602,
                    message: "Invalid param: before".to_string(),
                }),
            }
        }

        async fn fetch_transaction(
            &self,
            _signature: &Signature,
        ) -> Result<Option<ParsedTransaction>, DataSourceError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_blank_cursor_terminates_without_request() {
        let source = BlankTailSource::default();
        let history = HistoryPaginator::new(2)
            .collect(&source, &Address::new("wallet"), &NoopProgress)
            .await;

        assert_eq!(history.signatures.len(), 2);
        assert!(!history.is_partial());
        assert!(history.truncated_by.is_none());
        assert_eq!(*source.requests.lock().unwrap(), vec![None]);
    }
}
