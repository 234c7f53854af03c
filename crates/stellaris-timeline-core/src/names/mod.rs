//! Display names for things found in saves: localized name templates, identifier labels
//! and planet class lookups.

mod labels;
pub mod localization;
pub mod tables;
pub mod template;

pub use labels::to_label;
pub use localization::{parse_line, LocalizationTable};
pub use tables::{color, is_colonizable_megastructure, is_colonizable_planet, is_destroyed_planet, Rgb};
pub use template::{parse_name, render, NameDescriptor, NameNode, Variable, DEFAULT_NAME};

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Renders JSON-encoded names against the localization table.
///
/// The table is read from `sources` on first use and at most once, even if several threads
/// render at the same time. Share one renderer (e.g. behind an `Arc`) instead of building many.
#[derive(Debug, Default)]
pub struct NameRenderer {
    sources: Vec<PathBuf>,
    table: OnceLock<LocalizationTable>,
}

impl NameRenderer {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            table: OnceLock::new(),
        }
    }

    /// A renderer with an already built table; `sources` are never read.
    pub fn with_table(table: LocalizationTable) -> Self {
        Self {
            sources: Vec::new(),
            table: OnceLock::from(table),
        }
    }

    pub fn table(&self) -> &LocalizationTable {
        self.table.get_or_init(|| {
            let table = LocalizationTable::load(&self.sources);
            info!(
                "Loaded {} localization entries from {} files",
                table.len(),
                self.sources.len()
            );
            table
        })
    }

    /// Render a name given as JSON text. Text that is not JSON is returned unchanged.
    pub fn render_name(&self, name_json: &str) -> String {
        let Some(node) = parse_name(name_json) else {
            return name_json.to_string();
        };
        let rendered = render(&node, self.table());
        if rendered == DEFAULT_NAME {
            warn!("Failed to resolve a name, please check if you configured localization files.");
            warn!("Set `localization_files` in Config.toml to the game's localisation/english/*.yml files.");
            warn!("Failed name: {:?}", name_json);
        }
        rendered
    }

    pub fn render(&self, node: &NameNode) -> String {
        render(node, self.table())
    }
}
