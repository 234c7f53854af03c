use super::SaveArchiveRef;
use crate::error::Error;
use std::fs::{self, File};
use std::hash::Hasher as _;
use std::io::Read;
use std::time::UNIX_EPOCH;
use twox_hash::XxHash64;

/// Turns a save archive on disk into a snapshot. The game-state parser lives behind this.
pub trait SaveDecoder: Send + Sync {
    fn decode(&self, archive: &SaveArchiveRef) -> Result<Snapshot, Error>;
}

/// Decoded state of one run at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub archive: SaveArchiveRef,
    pub file_size: u64,
    /// Seconds since the epoch, 0 when the platform cannot report it.
    pub modified: i64,
    /// XxHash64 of the archive bytes; two snapshots of a run with the same hash are the same save.
    pub content_hash: u64,
    pub data: Vec<u8>,
}

impl Snapshot {
    pub fn run_id(&self) -> &str {
        &self.archive.run_id
    }
}

/// Default decoder: reads the raw archive and fingerprints it.
///
/// Empty files are rejected; the game creates the file before it finishes writing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveReader;

impl SaveDecoder for ArchiveReader {
    fn decode(&self, archive: &SaveArchiveRef) -> Result<Snapshot, Error> {
        let decode_err = |reason: String| Error::Decode {
            path: archive.path.clone(),
            reason,
        };

        let metadata = fs::metadata(&archive.path).map_err(|e| decode_err(e.to_string()))?;
        let data = read_full_file(archive).map_err(|e| decode_err(e.to_string()))?;
        if data.is_empty() {
            return Err(decode_err("archive is empty".to_string()));
        }

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        Ok(Snapshot {
            archive: archive.clone(),
            file_size: data.len() as u64,
            modified,
            content_hash: hash_data(&data),
            data,
        })
    }
}

fn read_full_file(archive: &SaveArchiveRef) -> std::io::Result<Vec<u8>> {
    let mut f = File::open(&archive.path)?;
    let mut buffer = Vec::new();
    f.read_to_end(&mut buffer)?;
    Ok(buffer)
}

pub fn hash_data(data: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(data);
    hasher.finish()
}
