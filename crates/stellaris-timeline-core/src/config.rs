use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

pub const DEFAULT_POLLING_INTERVAL_SECS: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder holding one save folder per game.
    pub save_file_path: PathBuf,
    pub save_file_pattern: String,
    pub db_path: PathBuf,
    pub polling_interval_secs: f64,
    /// Worker threads used when reading saves in batch mode.
    pub threads: usize,
    /// Localization sources, read in order; later files win on duplicate keys.
    pub localization_files: Vec<PathBuf>,
    pub game_name_prefix: String,
    /// Include all empires in charts regardless of visibility.
    pub show_everything: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_file_path: default_save_path(),
            save_file_pattern: "*.sav".to_string(),
            db_path: PathBuf::from("stellaris_timeline.db"),
            polling_interval_secs: DEFAULT_POLLING_INTERVAL_SECS,
            threads: default_threads(),
            localization_files: Vec::new(),
            game_name_prefix: String::new(),
            show_everything: false,
        }
    }
}

impl AppConfig {
    /// Polling interval as a `Duration`. Negative or non-finite values fall back to the default.
    pub fn polling_interval(&self) -> Duration {
        polling_interval_from_secs(self.polling_interval_secs)
    }
}

pub fn polling_interval_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs >= 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::from_secs_f64(DEFAULT_POLLING_INTERVAL_SECS)
    }
}

/// Load `Config.toml` from the working directory (if present), then `TIMELINE_*` overrides.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("TIMELINE").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Half the cores minus one, leaving room for the game itself.
pub fn default_threads() -> usize {
    let cpus = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus / 2).saturating_sub(1).max(1)
}

fn default_save_path() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/share/Paradox Interactive/Stellaris/save games/")
}
