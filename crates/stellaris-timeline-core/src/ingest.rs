//! Drives extraction from the save monitor, either continuously or as a one-shot batch.

use crate::cancel::CancelToken;
use crate::discovery::{PollEvent, SaveDecoder, SavePathMonitor, Snapshot};
use crate::error::Error;
use crate::progress::IngestReporter;
use crate::selection::MostRecentRun;
use rayon::ThreadPoolBuilder;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Consumes decoded snapshots. Must be idempotent per (run, snapshot identity).
pub trait Extractor {
    /// Returns `true` if the snapshot added anything new.
    fn ingest(&mut self, run_id: &str, snapshot: &Snapshot) -> Result<bool, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    CatchUp,
    Draining,
    Idle,
    Stopped,
}

#[derive(Debug, Default, Clone)]
pub struct MonitorSummary {
    /// Archives present at start-up and marked processed without extraction.
    pub caught_up: usize,
    pub ingested: usize,
    /// Archives that could not be decoded.
    pub skipped: usize,
    /// Snapshots the extractor rejected.
    pub failed: usize,
    pub idle_waits: usize,
    pub duration: Duration,
}

/// Interactive monitoring: skip what is already on disk, then ingest new saves as they appear.
///
/// States: `CatchUp → Draining ⇄ Idle → Stopped`. The cancel token is checked before every
/// scan, between snapshots and before each wait; the wait itself wakes on cancellation.
pub struct MonitorLoop {
    polling_interval: Duration,
    cancel: CancelToken,
    latest: MostRecentRun,
    state: LoopState,
}

impl MonitorLoop {
    pub fn new(polling_interval: Duration) -> Self {
        Self {
            polling_interval,
            cancel: CancelToken::new(),
            latest: MostRecentRun::new(),
            state: LoopState::CatchUp,
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_most_recent(mut self, latest: MostRecentRun) -> Self {
        self.latest = latest;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn most_recent(&self) -> MostRecentRun {
        self.latest.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until cancelled. Only a failure to scan the save folder at start-up is fatal.
    pub fn run<D: SaveDecoder, E: Extractor>(
        &mut self,
        monitor: &mut SavePathMonitor<D>,
        extractor: &mut E,
        reporter: &dyn IngestReporter,
    ) -> Result<MonitorSummary, Error> {
        let start = Instant::now();
        let mut summary = MonitorSummary::default();
        let mut show_wait_message = true;
        self.state = LoopState::CatchUp;

        loop {
            self.state = match self.state {
                LoopState::CatchUp => {
                    if self.cancel.is_cancelled() {
                        LoopState::Stopped
                    } else {
                        summary.caught_up = monitor.mark_all_processed()?;
                        reporter.on_catch_up(summary.caught_up);
                        LoopState::Draining
                    }
                }
                LoopState::Draining => {
                    if self.cancel.is_cancelled() {
                        LoopState::Stopped
                    } else if self.drain_once(monitor, extractor, reporter, &mut summary) > 0 {
                        show_wait_message = true;
                        LoopState::Draining
                    } else {
                        LoopState::Idle
                    }
                }
                LoopState::Idle => {
                    if self.cancel.is_cancelled() {
                        LoopState::Stopped
                    } else {
                        if show_wait_message {
                            show_wait_message = false;
                            info!("Waiting for new saves in {}", monitor.root().display());
                            reporter.on_waiting(monitor.root());
                        }
                        summary.idle_waits += 1;
                        if self.cancel.wait_timeout(self.polling_interval) {
                            LoopState::Stopped
                        } else {
                            LoopState::Draining
                        }
                    }
                }
                LoopState::Stopped => break,
            };
        }

        summary.duration = start.elapsed();
        info!(
            "Stopped monitoring saves: {} ingested, {} skipped",
            summary.ingested, summary.skipped
        );
        Ok(summary)
    }

    /// One scan pass. Returns the number of new archives pulled from the monitor.
    fn drain_once<D: SaveDecoder, E: Extractor>(
        &self,
        monitor: &mut SavePathMonitor<D>,
        extractor: &mut E,
        reporter: &dyn IngestReporter,
        summary: &mut MonitorSummary,
    ) -> usize {
        let mut events = match monitor.poll_new() {
            Ok(events) => events,
            Err(err) => {
                warn!("Failed to scan for new saves: {}", err);
                return 0;
            }
        };

        let mut found = 0;
        while !self.cancel.is_cancelled() {
            let Some(event) = events.next() else {
                break;
            };
            found += 1;
            handle_event(event, extractor, reporter, Some(&self.latest), summary);
        }
        found
    }
}

/// One-shot ingestion of every archive the monitor has not handed out yet.
///
/// Archives are decoded `threads` at a time on a dedicated pool and extracted in discovery
/// order. No waiting, no repetition.
pub fn ingest_all<D: SaveDecoder, E: Extractor>(
    monitor: &mut SavePathMonitor<D>,
    extractor: &mut E,
    threads: usize,
    reporter: &dyn IngestReporter,
) -> Result<MonitorSummary, Error> {
    let start = Instant::now();
    let mut summary = MonitorSummary::default();
    let threads = threads.max(1);

    let pending = monitor.pending()?;
    info!(
        "Reading {} saves from {} with {} threads",
        pending.len(),
        monitor.root().display(),
        threads
    );
    reporter.on_batch_start(pending.len());

    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    for chunk in pending.chunks(threads) {
        for event in monitor.decode_batch(&pool, chunk) {
            handle_event(event, extractor, reporter, None, &mut summary);
        }
    }

    summary.duration = start.elapsed();
    reporter.on_batch_complete(summary.ingested, summary.duration);
    debug!(
        "Batch completed in {:.2}s: {} ingested, {} skipped, {} failed",
        summary.duration.as_secs_f64(),
        summary.ingested,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

fn handle_event<E: Extractor>(
    event: PollEvent,
    extractor: &mut E,
    reporter: &dyn IngestReporter,
    latest: Option<&MostRecentRun>,
    summary: &mut MonitorSummary,
) {
    match event {
        PollEvent::Snapshot(snapshot) => {
            let run_id = snapshot.run_id().to_string();
            match extractor.ingest(&run_id, &snapshot) {
                Ok(_) => {
                    summary.ingested += 1;
                    reporter.on_snapshot(&run_id, &snapshot.archive.path);
                    if let Some(latest) = latest {
                        latest.set(&run_id);
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        "Failed to extract {}: {}",
                        snapshot.archive.path.display(),
                        err
                    );
                }
            }
        }
        PollEvent::Skipped { archive, error } => {
            summary.skipped += 1;
            reporter.on_skipped(&archive.path, &error.to_string());
        }
    }
}
