use super::walk::{find_save_archives, list_run_dirs};
use super::{ProcessedSet, SaveArchiveRef, SaveDecoder, Snapshot};
use crate::error::Error;
use glob::Pattern;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of handing one new archive to the decoder.
#[derive(Debug)]
pub enum PollEvent {
    Snapshot(Snapshot),
    /// The archive could not be decoded. It is still marked processed so it is not retried.
    Skipped { archive: SaveArchiveRef, error: Error },
}

impl PollEvent {
    pub fn run_id(&self) -> &str {
        match self {
            PollEvent::Snapshot(snapshot) => snapshot.run_id(),
            PollEvent::Skipped { archive, .. } => &archive.run_id,
        }
    }
}

/// Watches a save folder (`root/<run_id>/*.sav`) and hands out archives it has not seen yet.
pub struct SavePathMonitor<D> {
    root: PathBuf,
    pattern: Pattern,
    decoder: D,
    run_filter: Option<String>,
    processed: ProcessedSet,
}

impl<D: SaveDecoder> SavePathMonitor<D> {
    /// Fails if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>, decoder: D) -> Result<Self, Error> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Save directory {} does not exist", root.display()),
            )));
        }
        Ok(Self {
            root,
            pattern: Pattern::new("*.sav")?,
            decoder,
            run_filter: None,
            processed: ProcessedSet::default(),
        })
    }

    pub fn with_save_pattern(mut self, glob: &str) -> Result<Self, Error> {
        self.pattern = Pattern::new(glob)?;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Restrict discovery to runs whose id starts with `prefix`. An empty prefix clears the filter.
    ///
    /// Returns the runs currently on disk that match; warns when there are none.
    pub fn apply_run_filter(&mut self, prefix: &str) -> Result<Vec<String>, Error> {
        self.run_filter = if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_string())
        };
        let matching = self.known_runs()?;
        if matching.is_empty() {
            warn!(
                "No game matching \"{}\" was found in {}",
                prefix,
                self.root.display()
            );
        } else {
            info!(
                "Found matching games {} for prefix \"{}\"",
                matching.join(", "),
                prefix
            );
        }
        Ok(matching)
    }

    /// Run folders on disk, after the run filter.
    pub fn known_runs(&self) -> Result<Vec<String>, Error> {
        Ok(list_run_dirs(&self.root, self.run_filter.as_deref())?)
    }

    /// Record every archive currently on disk as processed without yielding it.
    pub fn mark_all_processed(&mut self) -> Result<usize, Error> {
        let mut marked = 0;
        for archive in self.scan()? {
            if self.processed.insert(archive) {
                marked += 1;
            }
        }
        debug!("Marked {} existing saves as processed", marked);
        Ok(marked)
    }

    /// Archives on disk that have not been handed out yet, in discovery order.
    pub fn pending(&self) -> Result<Vec<SaveArchiveRef>, Error> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|archive| !self.processed.contains(archive))
            .collect())
    }

    /// Scan once and return a lazy iterator over the new archives.
    ///
    /// Each archive is decoded and marked processed as it is yielded. Archives the caller
    /// never pulls (because it stopped early) stay pending for the next poll.
    pub fn poll_new(&mut self) -> Result<NewSnapshots<'_, D>, Error> {
        let pending = self.pending()?;
        Ok(NewSnapshots {
            monitor: self,
            pending: pending.into_iter(),
        })
    }

    /// Decode `archives` on `pool` and mark them all processed. Events keep input order.
    pub fn decode_batch(&mut self, pool: &ThreadPool, archives: &[SaveArchiveRef]) -> Vec<PollEvent> {
        let decoder = &self.decoder;
        let events: Vec<PollEvent> = pool.install(|| {
            archives
                .par_iter()
                .map(|archive| decode_event(decoder, archive.clone()))
                .collect()
        });
        for archive in archives {
            self.processed.insert(archive.clone());
        }
        events
    }

    fn scan(&self) -> Result<Vec<SaveArchiveRef>, Error> {
        Ok(find_save_archives(
            &self.root,
            &self.pattern,
            self.run_filter.as_deref(),
        )?)
    }
}

/// Iterator returned by [`SavePathMonitor::poll_new`].
pub struct NewSnapshots<'a, D> {
    monitor: &'a mut SavePathMonitor<D>,
    pending: std::vec::IntoIter<SaveArchiveRef>,
}

impl<D: SaveDecoder> Iterator for NewSnapshots<'_, D> {
    type Item = PollEvent;

    fn next(&mut self) -> Option<PollEvent> {
        let archive = self.pending.next()?;
        let event = decode_event(&self.monitor.decoder, archive.clone());
        self.monitor.processed.insert(archive);
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

fn decode_event<D: SaveDecoder>(decoder: &D, archive: SaveArchiveRef) -> PollEvent {
    match decoder.decode(&archive) {
        Ok(snapshot) => PollEvent::Snapshot(snapshot),
        Err(error) => {
            warn!("Skipping save {}: {}", archive.path.display(), error);
            PollEvent::Skipped { archive, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ArchiveReader;
    use std::fs;
    use tempfile::tempdir;

    fn write_save(root: &Path, run: &str, name: &str, content: &[u8]) {
        let dir = root.join(run);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_open_requires_existing_directory() {
        let tmp = tempdir().unwrap();
        assert!(SavePathMonitor::open(tmp.path().join("missing"), ArchiveReader).is_err());
    }

    #[test]
    fn test_poll_marks_each_archive_once() {
        let tmp = tempdir().unwrap();
        write_save(tmp.path(), "game_a", "2200.01.01.sav", b"one");
        write_save(tmp.path(), "game_a", "2200.02.01.sav", b"two");

        let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
        let first: Vec<_> = monitor.poll_new().unwrap().collect();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|e| e.run_id() == "game_a"));

        assert_eq!(monitor.poll_new().unwrap().count(), 0);

        write_save(tmp.path(), "game_a", "2200.03.01.sav", b"three");
        let third: Vec<_> = monitor.poll_new().unwrap().collect();
        assert_eq!(third.len(), 1);
        match &third[0] {
            PollEvent::Snapshot(s) => assert!(s.archive.path.ends_with("2200.03.01.sav")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_stopping_early_leaves_rest_pending() {
        let tmp = tempdir().unwrap();
        write_save(tmp.path(), "game_a", "a.sav", b"a");
        write_save(tmp.path(), "game_b", "b.sav", b"b");

        let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
        {
            let mut iter = monitor.poll_new().unwrap();
            assert_eq!(iter.next().unwrap().run_id(), "game_a");
        }
        let rest: Vec<_> = monitor.poll_new().unwrap().collect();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].run_id(), "game_b");
    }

    #[test]
    fn test_empty_archive_is_skipped_and_not_retried() {
        let tmp = tempdir().unwrap();
        write_save(tmp.path(), "game_a", "broken.sav", b"");

        let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
        let events: Vec<_> = monitor.poll_new().unwrap().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], PollEvent::Skipped { .. }));
        assert_eq!(monitor.poll_new().unwrap().count(), 0);
    }

    #[test]
    fn test_custom_save_pattern() {
        let tmp = tempdir().unwrap();
        write_save(tmp.path(), "game_a", "autosave_2200.01.01.sav", b"a");
        write_save(tmp.path(), "game_a", "2200.01.01.sav", b"b");

        let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader)
            .unwrap()
            .with_save_pattern("autosave_*.sav")
            .unwrap();
        assert_eq!(monitor.poll_new().unwrap().count(), 1);
    }

    #[test]
    fn test_decode_batch_keeps_order_and_marks_processed() {
        let tmp = tempdir().unwrap();
        write_save(tmp.path(), "game_a", "a.sav", b"a");
        write_save(tmp.path(), "game_b", "b.sav", b"");
        write_save(tmp.path(), "game_c", "c.sav", b"c");

        let mut monitor = SavePathMonitor::open(tmp.path(), ArchiveReader).unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let pending = monitor.pending().unwrap();
        let events = monitor.decode_batch(&pool, &pending);

        let runs: Vec<_> = events.iter().map(|e| e.run_id().to_string()).collect();
        assert_eq!(runs, vec!["game_a", "game_b", "game_c"]);
        assert!(matches!(events[1], PollEvent::Skipped { .. }));
        assert!(monitor.pending().unwrap().is_empty());
    }
}
