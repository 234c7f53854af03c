use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "stellaris-timeline")]
#[command(about = "Follow Stellaris saves and record each game's timeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the recorded history of every game matching the prefix
    Visualize {
        /// Prefix of the game id, e.g. "uni" for unitednationsofearth_-15512622
        #[arg(long)]
        game_name: Option<String>,
        /// Include all empires regardless of visibility
        #[arg(long)]
        showeverything: bool,
    },
    /// Compare the recorded histories of all games matching the prefix
    VisualizeGameComparison {
        #[arg(long)]
        game_name: Option<String>,
        #[arg(long)]
        showeverything: bool,
    },
    /// Watch the save folder and record new saves as they are written
    MonitorSaves {
        #[arg(long)]
        save_path: Option<PathBuf>,
        /// Seconds between scans of the save folder
        #[arg(long)]
        polling_interval: Option<f64>,
    },
    /// Record every save already in the save folder
    ParseSaves {
        /// Worker threads used to read saves
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        save_path: Option<PathBuf>,
        /// Only read games whose id starts with this prefix
        #[arg(long)]
        game_name: Option<String>,
    },
    /// Render a JSON name descriptor using the configured localization files
    RenderName {
        json: String,
    },
    /// Turn an identifier such as pc_ai_tb into a display label
    Label {
        identifier: String,
        #[arg(long, default_value = "")]
        remove_prefix: String,
    },
    /// Print configuration values
    PrintConfig,
}
