//! Hands recorded game histories to a chart renderer.

use crate::error::Error;
use crate::storage::models::{GameRun, SnapshotRecord};
use crate::storage::Database;
use tracing::{error, info, warn};

/// Everything recorded for one game, oldest snapshot first.
#[derive(Debug, Clone)]
pub struct RunHistory {
    pub run: GameRun,
    pub snapshots: Vec<SnapshotRecord>,
}

/// Drawing backend. `show_everything` asks for all empires regardless of visibility.
pub trait ChartRenderer {
    fn render_run(&mut self, history: &RunHistory, show_everything: bool) -> Result<(), Error>;

    fn render_comparison(
        &mut self,
        comparison_id: &str,
        histories: &[RunHistory],
        show_everything: bool,
    ) -> Result<(), Error>;
}

/// Known games whose id starts with `prefix`. Warns when there are none.
pub fn resolve_runs(db: &Database, prefix: &str) -> Result<Vec<String>, Error> {
    let matching = db.get_known_runs(prefix)?;
    if matching.is_empty() {
        warn!("No game matching \"{}\" was found in the database!", prefix);
    } else {
        info!(
            "Found matching games {} for prefix \"{}\"",
            matching.join(", "),
            prefix
        );
    }
    Ok(matching)
}

pub fn load_history(db: &Database, name: &str) -> Result<Option<RunHistory>, Error> {
    let Some(run) = db.get_game(name)? else {
        return Ok(None);
    };
    let snapshots = db.list_snapshots(run.id)?;
    Ok(Some(RunHistory { run, snapshots }))
}

/// Render one chart set per matching game. Returns how many games matched the prefix.
pub fn visualize_runs(
    db: &Database,
    prefix: &str,
    show_everything: bool,
    renderer: &mut dyn ChartRenderer,
) -> Result<usize, Error> {
    let matching = resolve_runs(db, prefix)?;
    for name in &matching {
        match load_history(db, name)? {
            Some(history) => renderer.render_run(&history, show_everything)?,
            None => error!("No game matching \"{}\" was found in the database!", name),
        }
    }
    Ok(matching.len())
}

/// Render one comparative chart set over all matching games. Returns how many matched.
pub fn visualize_comparison(
    db: &Database,
    prefix: &str,
    show_everything: bool,
    renderer: &mut dyn ChartRenderer,
) -> Result<usize, Error> {
    let matching = resolve_runs(db, prefix)?;
    if matching.is_empty() {
        return Ok(0);
    }

    let mut histories = Vec::with_capacity(matching.len());
    for name in &matching {
        match load_history(db, name)? {
            Some(history) => histories.push(history),
            None => error!("No game matching \"{}\" was found in the database!", name),
        }
    }
    renderer.render_comparison(prefix, &histories, show_everything)?;
    Ok(matching.len())
}
