use super::SaveArchiveRef;
use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::error;
use walkdir::WalkDir;

/// Find every save archive under `root`, laid out as `root/<run_id>/<save file>`.
///
/// Only file names matching `pattern` count. When `run_prefix` is set, runs whose id does
/// not start with it are skipped. Results are ordered by run id, then modification time,
/// then path, so snapshots of one run come out oldest first.
pub fn find_save_archives(
    root: &Path,
    pattern: &Pattern,
    run_prefix: Option<&str>,
) -> io::Result<Vec<SaveArchiveRef>> {
    let mut found: Vec<(SaveArchiveRef, SystemTime)> = Vec::new();

    for entry in WalkDir::new(root).min_depth(2).max_depth(2).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(err.into());
                }
                error!("Error reading save directory entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if !pattern.matches(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let run_id = match entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
        {
            Some(run_id) => run_id,
            None => continue,
        };
        if let Some(prefix) = run_prefix {
            if !run_id.starts_with(prefix) {
                continue;
            }
        }

        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((SaveArchiveRef::new(run_id, entry.into_path()), modified));
    }

    found.sort_by(|(a, a_time), (b, b_time)| {
        a.run_id
            .cmp(&b.run_id)
            .then(a_time.cmp(b_time))
            .then(a.path.cmp(&b.path))
    });
    Ok(found.into_iter().map(|(archive, _)| archive).collect())
}

/// Ids of the run folders directly under `root`, sorted, optionally filtered by prefix.
pub fn list_run_dirs(root: &Path, run_prefix: Option<&str>) -> io::Result<Vec<String>> {
    let mut runs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!("Error reading entry in {}: {}", root.display(), err);
                continue;
            }
        };
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if run_prefix.map_or(true, |prefix| name.starts_with(prefix)) {
            runs.push(name);
        }
    }
    runs.sort();
    Ok(runs)
}
