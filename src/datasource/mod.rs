//! Ledger data source abstraction: signature pages and transaction details.

use crate::domain::{Address, ParsedTransaction, Signature, SignatureInfo};
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod solana;

pub use mock::MockLedgerSource;
pub use solana::SolanaRpcSource;

/// Read API of a ledger node.
///
/// Implementations own retry/backoff and rate limiting; callers treat any
/// returned error as final for that request.
#[async_trait]
pub trait LedgerSource: Send + Sync + fmt::Debug {
    /// Fetch one page of signatures for transactions referencing `address`.
    ///
    /// # Arguments
    /// * `address` - Account whose history is walked
    /// * `before` - Only return signatures older than this one; `None` starts from the newest
    /// * `limit` - Maximum page size
    ///
    /// # Returns
    /// Signatures ordered newest to oldest. An empty page means the history is exhausted.
    async fn fetch_signatures(
        &self,
        address: &Address,
        before: Option<&Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, DataSourceError>;

    /// Resolve a signature to its transaction record.
    ///
    /// # Returns
    /// `None` if the node does not know the transaction.
    async fn fetch_transaction(
        &self,
        signature: &Signature,
    ) -> Result<Option<ParsedTransaction>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// JSON-RPC level error object
    RpcError { code: i64, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::RpcError { code, message } => {
                write!(f, "RPC error {}: {}", code, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
        }
    }
}

impl std::error::Error for DataSourceError {}
