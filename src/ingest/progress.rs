//! Progress reporting hooks for the I/O stages.

use crate::datasource::DataSourceError;
use crate::domain::Signature;
use tracing::{info, warn};

/// Observer notified as history is paged and details are resolved.
///
/// All methods default to no-ops so implementors pick what they need.
pub trait ProgressObserver: Send + Sync {
    fn on_page(&self, _page: usize, _page_len: usize, _total: usize) {}

    fn on_pagination_truncated(&self, _total: usize, _error: &DataSourceError) {}

    fn on_batch(&self, _batch: usize, _batches: usize, _resolved: usize) {}

    fn on_detail_failed(&self, _signature: &Signature, _error: &DataSourceError) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// Reports progress as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_page(&self, page: usize, page_len: usize, total: usize) {
        info!(page, page_len, total, "Fetched signature page");
    }

    fn on_pagination_truncated(&self, total: usize, error: &DataSourceError) {
        warn!(
            total,
            error = %error,
            "Signature pagination stopped early, continuing with partial history"
        );
    }

    fn on_batch(&self, batch: usize, batches: usize, resolved: usize) {
        info!(batch, batches, resolved, "Resolved transaction batch");
    }

    fn on_detail_failed(&self, signature: &Signature, error: &DataSourceError) {
        warn!(signature = %signature, error = %error, "Failed to fetch transaction detail");
    }
}
