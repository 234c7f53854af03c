use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flat key → template table built from the game's localization files.
#[derive(Debug, Clone)]
pub struct LocalizationTable {
    entries: HashMap<String, String>,
}

impl Default for LocalizationTable {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "global_event_country".to_string(),
            "Global event country".to_string(),
        );
        Self { entries }
    }
}

impl LocalizationTable {
    /// Read every source in order; later sources override earlier ones.
    ///
    /// Sources that cannot be opened are logged and skipped, as are lines that do not parse.
    pub fn load(sources: &[PathBuf]) -> Self {
        let mut table = Self::default();
        for source in sources {
            match table.load_file(source) {
                Ok(count) => debug!("Loaded {} localization entries from {}", count, source.display()),
                Err(err) => warn!("Could not read localization file {}: {}", source.display(), err),
            }
        }
        table
    }

    fn load_file(&mut self, path: &Path) -> io::Result<usize> {
        let reader = BufReader::new(File::open(path)?);
        Ok(self.extend_from_reader(reader))
    }

    /// Returns the number of entries read. Lines that are not valid UTF-8 are skipped on
    /// their own; a read error ends the source.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> usize {
        let mut count = 0;
        for (index, raw) in reader.split(b'\n').enumerate() {
            let raw = match raw {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("Stopped reading localization source at line {}: {}", index + 1, err);
                    break;
                }
            };
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(_) => {
                    debug!("Skipping localization line {}: not valid UTF-8", index + 1);
                    continue;
                }
            };
            if let Some((key, template)) = parse_line(&line) {
                self.entries.insert(key, template);
                count += 1;
            }
        }
        count
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (key, template) in iter {
            table.insert(key, template);
        }
        table
    }
}

/// Parse one localization line such as ` NAME_Earth:0 "Earth"`.
///
/// The key is everything before the first quote, trimmed, without a trailing `:0` version
/// (or a bare trailing `:`). The template is the text up to the next quote. Lines without a
/// quote yield `None`.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let mut segments = line.trim().split('"');
    let key = segments.next()?;
    let template = segments.next()?;

    let key = key.trim();
    let key = key.strip_suffix(":0").unwrap_or(key);
    let key = key.strip_suffix(':').unwrap_or(key);
    Some((key.to_string(), template.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_variants() {
        assert_eq!(
            parse_line(" NAME_Earth:0 \"Earth\""),
            Some(("NAME_Earth".to_string(), "Earth".to_string()))
        );
        assert_eq!(
            parse_line("war_name: \"War of <attacker>\" # comment"),
            Some(("war_name".to_string(), "War of <attacker>".to_string()))
        );
        assert_eq!(
            parse_line("planet_10:0 \"Ten\""),
            Some(("planet_10".to_string(), "Ten".to_string()))
        );
        assert_eq!(
            parse_line("key:1 \"versioned\""),
            Some(("key:1".to_string(), "versioned".to_string()))
        );
    }

    #[test]
    fn test_parse_line_without_quote_is_skipped() {
        assert_eq!(parse_line("l_english:"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   # just a comment"), None);
    }

    #[test]
    fn test_later_entries_win_and_synthetic_entry_present() {
        let mut table = LocalizationTable::default();
        let data = "l_english:\n a:0 \"first\"\n broken line\n a:0 \"second\"\n b:0 \"bee\"\n";
        let count = table.extend_from_reader(Cursor::new(data));
        assert_eq!(count, 3);
        assert_eq!(table.get("a"), Some("second"));
        assert_eq!(table.get("b"), Some("bee"));
        assert_eq!(table.get("global_event_country"), Some("Global event country"));
    }

    #[test]
    fn test_invalid_utf8_line_skips_only_that_line() {
        let mut table = LocalizationTable::default();
        let data: &[u8] = b"l_english:\r\n a:0 \"first\"\n bad:0 \"caf\xe9\"\n b:0 \"bee\"\n";
        let count = table.extend_from_reader(Cursor::new(data));
        assert_eq!(count, 2);
        assert_eq!(table.get("a"), Some("first"));
        assert_eq!(table.get("bad"), None);
        assert_eq!(table.get("b"), Some("bee"));
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yml");
        std::fs::write(&good, "l_english:\n x:0 \"from file\"\n").unwrap();

        let table = LocalizationTable::load(&[dir.path().join("missing.yml"), good]);
        assert_eq!(table.get("x"), Some("from file"));
        assert_eq!(table.len(), 2);
    }
}
