use crate::discovery::Snapshot;
use crate::error::Error;
use crate::ingest::Extractor;
use crate::storage::Database;
use std::path::Path;
use tracing::{debug, info};

/// Records every ingested snapshot in the run ledger.
///
/// A game gets at most one row per distinct save content, so re-reading the same save
/// (from a second batch run, or a copy under another file name) changes nothing.
pub struct TimelineExtractor {
    db: Database,
}

impl TimelineExtractor {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(db_path: &Path) -> Result<Self, Error> {
        Ok(Self::new(Database::open(db_path)?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_database(self) -> Database {
        self.db
    }
}

impl Extractor for TimelineExtractor {
    fn ingest(&mut self, run_id: &str, snapshot: &Snapshot) -> Result<bool, Error> {
        let game_id = self.db.get_or_create_game(run_id)?;
        let inserted = self.db.insert_snapshot(
            game_id,
            &snapshot.archive.path.to_string_lossy(),
            snapshot.file_size as i64,
            snapshot.modified,
            snapshot.content_hash as i64,
        )?;
        if inserted {
            info!(
                "Recorded {} for game {}",
                snapshot.archive.path.display(),
                run_id
            );
        } else {
            debug!(
                "{} is already recorded for game {}",
                snapshot.archive.path.display(),
                run_id
            );
        }
        Ok(inserted)
    }
}
