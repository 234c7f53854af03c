pub mod cancel;
pub mod config;
pub mod discovery;
pub mod error;
pub mod ingest;
pub mod names;
pub mod progress;
pub mod selection;
pub mod storage;
pub mod timeline;
pub mod visualize;

pub use cancel::CancelToken;
pub use config::AppConfig;
pub use discovery::{ArchiveReader, SaveArchiveRef, SaveDecoder, SavePathMonitor, Snapshot};
pub use error::Error;
pub use ingest::{Extractor, MonitorSummary};
pub use names::{
    is_colonizable_megastructure, is_colonizable_planet, is_destroyed_planet, to_label,
    NameRenderer,
};
pub use progress::{IngestReporter, SilentReporter};
pub use selection::{MostRecentRun, SelectedRun};
pub use timeline::TimelineExtractor;
