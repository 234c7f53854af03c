//! Save discovery: finding save archives on disk, remembering which ones were already
//! handed to extraction, and decoding the new ones.

mod decoder;
mod monitor;
mod walk;

pub use decoder::{hash_data, ArchiveReader, SaveDecoder, Snapshot};
pub use monitor::{NewSnapshots, PollEvent, SavePathMonitor};
pub use walk::{find_save_archives, list_run_dirs};

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// One save archive found on disk. Identity is the location, not the content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveArchiveRef {
    /// Name of the folder holding the archive, e.g. `unitednationsofearth_-15512622`.
    pub run_id: String,
    pub path: PathBuf,
}

impl SaveArchiveRef {
    pub fn new(run_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            path: path.into(),
        }
    }
}

/// Per-run record of archives already handed to extraction. Entries are never removed.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    by_run: HashMap<String, HashSet<PathBuf>>,
}

impl ProcessedSet {
    /// Returns `false` if the archive was already recorded.
    pub fn insert(&mut self, archive: SaveArchiveRef) -> bool {
        self.by_run
            .entry(archive.run_id)
            .or_default()
            .insert(archive.path)
    }

    pub fn contains(&self, archive: &SaveArchiveRef) -> bool {
        self.by_run
            .get(&archive.run_id)
            .is_some_and(|paths| paths.contains(&archive.path))
    }

    pub fn len(&self) -> usize {
        self.by_run.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn run_count(&self) -> usize {
        self.by_run.len()
    }
}
