use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use stellaris_timeline_core::IngestReporter;

/// CLI progress reporter using indicatif spinners.
///
/// - Batch reading: counting spinner over the pending saves
/// - Monitoring: a spinner while waiting for the next save
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl IngestReporter for CliReporter {
    fn on_catch_up(&self, archives_skipped: usize) {
        eprintln!(
            "  {} Skipped {} saves already on disk",
            "✓".green(),
            archives_skipped
        );
    }

    fn on_batch_start(&self, pending: usize) {
        let pb = ProgressBar::new(pending as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Reading saves [{bar:30.cyan/dim}] {pos}/{len} ({eta} remaining)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_snapshot(&self, run_id: &str, archive: &Path) {
        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut batch = false;
        self.with_bar(|pb| {
            if pb.length().is_some_and(|len| len > 0) {
                batch = true;
                pb.inc(1);
            }
        });
        if !batch {
            self.finish_bar();
            eprintln!("  {} {} {}", "✓".green(), run_id.cyan(), file_name);
        }
    }

    fn on_skipped(&self, archive: &Path, reason: &str) {
        let line = format!("  {} {}: {}", "✗".red(), archive.display(), reason);
        let mut shown = false;
        self.with_bar(|pb| {
            if pb.length().is_some_and(|len| len > 0) {
                pb.inc(1);
            }
            pb.println(&line);
            shown = true;
        });
        if !shown {
            eprintln!("{}", line);
        }
    }

    fn on_waiting(&self, root: &Path) {
        self.set_bar(Self::spinner(format!(
            "Waiting for new saves in {}...",
            root.display()
        )));
    }

    fn on_batch_complete(&self, ingested: usize, duration: Duration) {
        self.finish_bar();
        eprintln!(
            "  {} Read {} saves in {}",
            "✓".green(),
            ingested,
            format!("{:.2}s", duration.as_secs_f64()).green()
        );
    }
}
