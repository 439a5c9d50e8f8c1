//! I/O stages: walking signature history and resolving transaction details.

pub mod fetcher;
pub mod paginator;
pub mod progress;

pub use fetcher::{BatchFetcher, FetchOutcome, DEFAULT_BATCH_SIZE};
pub use paginator::{History, HistoryPaginator, DEFAULT_PAGE_SIZE};
pub use progress::{NoopProgress, ProgressObserver, TracingProgress};
