use std::path::Path;
use std::time::Duration;

/// Trait for reporting ingestion progress.
///
/// CLI implements with tracing/indicatif. All methods have default no-op implementations.
pub trait IngestReporter: Send + Sync {
    fn on_catch_up(&self, _archives_skipped: usize) {}
    fn on_batch_start(&self, _pending: usize) {}
    fn on_snapshot(&self, _run_id: &str, _archive: &Path) {}
    fn on_skipped(&self, _archive: &Path, _reason: &str) {}
    fn on_waiting(&self, _root: &Path) {}
    fn on_batch_complete(&self, _ingested: usize, _duration: Duration) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl IngestReporter for SilentReporter {}
