use crate::cancel::CancelToken;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// Id of the game whose save was ingested last.
///
/// One writer (the discovery loop) and any number of readers. Clones share the cell.
#[derive(Debug, Clone, Default)]
pub struct MostRecentRun {
    cell: Arc<RwLock<Option<String>>>,
}

impl MostRecentRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, run_id: &str) {
        let mut guard = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_deref() != Some(run_id) {
            *guard = Some(run_id.to_string());
        }
    }

    pub fn get(&self) -> Option<String> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// The game currently shown by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct SelectedRun {
    cell: Arc<RwLock<Option<String>>>,
}

impl SelectedRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, run_id: &str) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = Some(run_id.to_string());
    }

    pub fn get(&self) -> Option<String> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Switch the selection to the most recently updated game when they differ.
///
/// Returns the newly selected id, if the selection changed.
pub fn reconcile(latest: &MostRecentRun, selected: &SelectedRun) -> Option<String> {
    let latest = latest.get()?;
    if selected.get().as_deref() == Some(latest.as_str()) {
        return None;
    }
    debug!("Updating selected game to {}", latest);
    selected.select(&latest);
    Some(latest)
}

/// Call [`reconcile`] every `interval` until cancelled, passing each new selection to `on_change`.
pub fn run_reconciler<F: FnMut(&str)>(
    latest: &MostRecentRun,
    selected: &SelectedRun,
    interval: Duration,
    cancel: &CancelToken,
    mut on_change: F,
) {
    while !cancel.wait_timeout(interval) {
        if let Some(run_id) = reconcile(latest, selected) {
            on_change(&run_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_reconcile_follows_latest_game() {
        let latest = MostRecentRun::new();
        let selected = SelectedRun::new();

        assert_eq!(reconcile(&latest, &selected), None);

        latest.set("game_a");
        assert_eq!(reconcile(&latest, &selected).as_deref(), Some("game_a"));
        assert_eq!(reconcile(&latest, &selected), None);

        latest.set("game_b");
        assert_eq!(reconcile(&latest, &selected).as_deref(), Some("game_b"));
        assert_eq!(selected.get().as_deref(), Some("game_b"));
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_values() {
        let latest = MostRecentRun::new();
        let writer = latest.clone();
        let handle = thread::spawn(move || {
            for i in 0..1000 {
                writer.set(if i % 2 == 0 { "alpha_game" } else { "beta_game" });
            }
        });
        for _ in 0..1000 {
            if let Some(run) = latest.get() {
                assert!(run == "alpha_game" || run == "beta_game");
            }
        }
        handle.join().unwrap();
    }

    #[test]
    fn test_reconciler_stops_on_cancel() {
        let latest = MostRecentRun::new();
        let selected = SelectedRun::new();
        latest.set("game_a");
        let cancel = CancelToken::new();

        let (l, s, c) = (latest.clone(), selected.clone(), cancel.clone());
        let handle = thread::spawn(move || {
            let mut changes = Vec::new();
            run_reconciler(&l, &s, Duration::from_millis(5), &c, |run| {
                changes.push(run.to_string())
            });
            changes
        });
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
        let changes = handle.join().unwrap();
        assert_eq!(selected.get().as_deref(), Some("game_a"));
        assert_eq!(changes, vec!["game_a".to_string()]);
    }
}
