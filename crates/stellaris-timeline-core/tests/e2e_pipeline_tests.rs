use std::fs;
use std::path::Path;
use tempfile::tempdir;

use stellaris_timeline_core::ingest::ingest_all;
use stellaris_timeline_core::storage::Database;
use stellaris_timeline_core::visualize::{
    visualize_comparison, visualize_runs, ChartRenderer, RunHistory,
};
use stellaris_timeline_core::{
    ArchiveReader, Error, SavePathMonitor, SilentReporter, TimelineExtractor,
};

/// Layout:
///   saves/
///     unitednationsofearth_-15512622/
///       2200.01.01.sav
///       2200.06.01.sav
///       autosave_2200.06.01.sav   (same bytes as 2200.06.01.sav)
///     lokkenmechanists_1256936305/
///       2210.01.01.sav
///       broken.sav                (empty, still being written)
///       readme.txt
fn create_save_tree(root: &Path) {
    let une = root.join("unitednationsofearth_-15512622");
    let lok = root.join("lokkenmechanists_1256936305");
    fs::create_dir_all(&une).unwrap();
    fs::create_dir_all(&lok).unwrap();

    fs::write(une.join("2200.01.01.sav"), "gamestate une 2200.01.01").unwrap();
    fs::write(une.join("2200.06.01.sav"), "gamestate une 2200.06.01").unwrap();
    fs::write(une.join("autosave_2200.06.01.sav"), "gamestate une 2200.06.01").unwrap();
    fs::write(lok.join("2210.01.01.sav"), "gamestate lok 2210.01.01").unwrap();
    fs::write(lok.join("broken.sav"), "").unwrap();
    fs::write(lok.join("readme.txt"), "not a save").unwrap();
}

#[derive(Default)]
struct RecordingRenderer {
    runs: Vec<(String, usize)>,
    comparisons: Vec<(String, Vec<String>)>,
}

impl ChartRenderer for RecordingRenderer {
    fn render_run(&mut self, history: &RunHistory, _show_everything: bool) -> Result<(), Error> {
        self.runs
            .push((history.run.name.clone(), history.snapshots.len()));
        Ok(())
    }

    fn render_comparison(
        &mut self,
        comparison_id: &str,
        histories: &[RunHistory],
        _show_everything: bool,
    ) -> Result<(), Error> {
        self.comparisons.push((
            comparison_id.to_string(),
            histories.iter().map(|h| h.run.name.clone()).collect(),
        ));
        Ok(())
    }
}

#[test]
fn test_batch_ingestion_twice_is_idempotent() {
    let tmp = tempdir().unwrap();
    let saves = tmp.path().join("saves");
    create_save_tree(&saves);

    let mut extractor = TimelineExtractor::new(Database::open_in_memory().unwrap());

    let mut monitor = SavePathMonitor::open(&saves, ArchiveReader).unwrap();
    let first = ingest_all(&mut monitor, &mut extractor, 2, &SilentReporter).unwrap();
    assert_eq!(first.ingested, 4);
    assert_eq!(first.skipped, 1);

    let db = extractor.database();
    let une = db.get_game("unitednationsofearth_-15512622").unwrap().unwrap();
    // the autosave has the same content as the regular save
    assert_eq!(une.snapshot_count, 2);
    let lok = db.get_game("lokkenmechanists_1256936305").unwrap().unwrap();
    assert_eq!(lok.snapshot_count, 1);

    // a fresh monitor over the unchanged folder adds nothing to the ledger
    let mut monitor = SavePathMonitor::open(&saves, ArchiveReader).unwrap();
    ingest_all(&mut monitor, &mut extractor, 2, &SilentReporter).unwrap();
    let db = extractor.database();
    assert_eq!(db.snapshot_count(une.id).unwrap(), 2);
    assert_eq!(db.snapshot_count(lok.id).unwrap(), 1);

    // the same monitor yields nothing at all
    let again = ingest_all(&mut monitor, &mut extractor, 2, &SilentReporter).unwrap();
    assert_eq!(again.ingested, 0);
    assert_eq!(again.skipped, 0);
}

#[test]
fn test_catch_up_then_poll_is_empty() {
    let tmp = tempdir().unwrap();
    create_save_tree(tmp.path());

    let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
    let marked = monitor.mark_all_processed().unwrap();
    assert_eq!(marked, 5);
    assert_eq!(monitor.poll_new().unwrap().count(), 0);

    fs::write(
        tmp.path().join("lokkenmechanists_1256936305/2210.06.01.sav"),
        "gamestate lok 2210.06.01",
    )
    .unwrap();
    let events: Vec<_> = monitor.poll_new().unwrap().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].run_id(), "lokkenmechanists_1256936305");
}

#[test]
fn test_batch_with_run_filter() {
    let tmp = tempdir().unwrap();
    create_save_tree(tmp.path());

    let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
    let matching = monitor.apply_run_filter("uni").unwrap();
    assert_eq!(matching, vec!["unitednationsofearth_-15512622".to_string()]);

    let mut extractor = TimelineExtractor::new(Database::open_in_memory().unwrap());
    let summary = ingest_all(&mut monitor, &mut extractor, 1, &SilentReporter).unwrap();
    assert_eq!(summary.ingested, 3);
    assert_eq!(
        extractor.database().get_known_runs("").unwrap(),
        vec!["unitednationsofearth_-15512622".to_string()]
    );
}

#[test]
fn test_run_filter_without_match_is_empty() {
    let tmp = tempdir().unwrap();
    create_save_tree(tmp.path());

    let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
    assert!(monitor.apply_run_filter("zzz").unwrap().is_empty());

    let mut extractor = TimelineExtractor::new(Database::open_in_memory().unwrap());
    let summary = ingest_all(&mut monitor, &mut extractor, 4, &SilentReporter).unwrap();
    assert_eq!(summary.ingested, 0);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn test_visualize_resolves_prefix() {
    let tmp = tempdir().unwrap();
    create_save_tree(tmp.path());

    let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
    let mut extractor = TimelineExtractor::new(Database::open_in_memory().unwrap());
    ingest_all(&mut monitor, &mut extractor, 2, &SilentReporter).unwrap();
    let db = extractor.into_database();

    let mut renderer = RecordingRenderer::default();
    assert_eq!(visualize_runs(&db, "uni", false, &mut renderer).unwrap(), 1);
    assert_eq!(
        renderer.runs,
        vec![("unitednationsofearth_-15512622".to_string(), 2)]
    );

    assert_eq!(visualize_comparison(&db, "", true, &mut renderer).unwrap(), 2);
    assert_eq!(renderer.comparisons.len(), 1);
    assert_eq!(renderer.comparisons[0].1.len(), 2);

    assert_eq!(visualize_runs(&db, "nothing", false, &mut renderer).unwrap(), 0);
    assert_eq!(visualize_comparison(&db, "nothing", false, &mut renderer).unwrap(), 0);
    assert_eq!(renderer.comparisons.len(), 1);
}
