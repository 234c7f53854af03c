mod charts;
mod commands;
mod logging;
mod progress;

use std::process;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use charts::TextChartRenderer;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use stellaris_timeline_core::ingest::{ingest_all, MonitorLoop};
use stellaris_timeline_core::selection::run_reconciler;
use stellaris_timeline_core::storage::Database;
use stellaris_timeline_core::visualize::{
    load_history, visualize_comparison, visualize_runs, ChartRenderer,
};
use stellaris_timeline_core::{
    to_label, AppConfig, ArchiveReader, CancelToken, MostRecentRun, NameRenderer,
    SavePathMonitor, SelectedRun, TimelineExtractor,
};
use tracing::{error, info};

const RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match stellaris_timeline_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Visualize {
            game_name,
            showeverything,
        }) => {
            apply_chart_flags(&mut config, game_name, showeverything);
            run_visualize(&config)
        }
        Some(Commands::VisualizeGameComparison {
            game_name,
            showeverything,
        }) => {
            apply_chart_flags(&mut config, game_name, showeverything);
            run_visualize_comparison(&config)
        }
        Some(Commands::MonitorSaves {
            save_path,
            polling_interval,
        }) => {
            if let Some(save_path) = save_path {
                config.save_file_path = save_path;
            }
            if let Some(secs) = polling_interval {
                config.polling_interval_secs = secs;
            }
            run_monitor(&config, CancelToken::new(), MostRecentRun::new())
        }
        Some(Commands::ParseSaves {
            threads,
            save_path,
            game_name,
        }) => {
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if let Some(save_path) = save_path {
                config.save_file_path = save_path;
            }
            if let Some(game_name) = game_name {
                config.game_name_prefix = game_name;
            }
            run_parse_saves(&config)
        }
        Some(Commands::RenderName { json }) => {
            let renderer = NameRenderer::new(config.localization_files.clone());
            println!("{}", renderer.render_name(&json));
            Ok(true)
        }
        Some(Commands::Label {
            identifier,
            remove_prefix,
        }) => {
            println!("{}", to_label(&identifier, &remove_prefix));
            Ok(true)
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(true)
        }
        None => run_default(&config),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn apply_chart_flags(config: &mut AppConfig, game_name: Option<String>, showeverything: bool) {
    if let Some(game_name) = game_name {
        config.game_name_prefix = game_name;
    }
    config.show_everything |= showeverything;
}

fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    Database::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))
}

fn open_monitor(config: &AppConfig) -> anyhow::Result<SavePathMonitor<ArchiveReader>> {
    let monitor = SavePathMonitor::open(&config.save_file_path, ArchiveReader)
        .with_context(|| format!("opening save folder {}", config.save_file_path.display()))?
        .with_save_pattern(&config.save_file_pattern)?;
    Ok(monitor)
}

/// Returns `false` when no recorded game matches the prefix.
fn run_visualize(config: &AppConfig) -> anyhow::Result<bool> {
    let db = open_database(config)?;
    let mut renderer = TextChartRenderer::new();
    let matched = visualize_runs(
        &db,
        &config.game_name_prefix,
        config.show_everything,
        &mut renderer,
    )?;
    Ok(matched > 0)
}

fn run_visualize_comparison(config: &AppConfig) -> anyhow::Result<bool> {
    let db = open_database(config)?;
    let mut renderer = TextChartRenderer::new();
    let matched = visualize_comparison(
        &db,
        &config.game_name_prefix,
        config.show_everything,
        &mut renderer,
    )?;
    Ok(matched > 0)
}

/// Open the save folder, restricted to `game_name_prefix` when one is set.
///
/// Returns `None` when the prefix matches no game folder.
fn open_filtered_monitor(
    config: &AppConfig,
) -> anyhow::Result<Option<SavePathMonitor<ArchiveReader>>> {
    let mut monitor = open_monitor(config)?;
    if !config.game_name_prefix.is_empty()
        && monitor.apply_run_filter(&config.game_name_prefix)?.is_empty()
    {
        return Ok(None);
    }
    Ok(Some(monitor))
}

fn run_parse_saves(config: &AppConfig) -> anyhow::Result<bool> {
    let Some(mut monitor) = open_filtered_monitor(config)? else {
        return Ok(false);
    };

    let mut extractor = TimelineExtractor::new(open_database(config)?);
    let reporter = CliReporter::new();
    let summary = ingest_all(&mut monitor, &mut extractor, config.threads, &reporter)?;

    info!(
        "{} saves read, {} skipped, {} failed in {}",
        format!("{}", summary.ingested).green(),
        format!("{}", summary.skipped).yellow(),
        format!("{}", summary.failed).red(),
        format!("{:.2}s", summary.duration.as_secs_f64()).green(),
    );
    Ok(true)
}

fn run_monitor(
    config: &AppConfig,
    cancel: CancelToken,
    latest: MostRecentRun,
) -> anyhow::Result<bool> {
    let Some(mut monitor) = open_filtered_monitor(config)? else {
        return Ok(false);
    };
    let mut extractor = TimelineExtractor::new(open_database(config)?);
    let reporter = CliReporter::new();
    let mut monitor_loop = MonitorLoop::new(config.polling_interval())
        .with_cancel_token(cancel)
        .with_most_recent(latest);

    let summary = monitor_loop.run(&mut monitor, &mut extractor, &reporter)?;
    info!(
        "{} new saves recorded, {} skipped over {}",
        format!("{}", summary.ingested).green(),
        format!("{}", summary.skipped).yellow(),
        format!("{:.2}s", summary.duration.as_secs_f64()).green(),
    );
    Ok(true)
}

/// Monitor saves on a worker thread and show whichever game was saved last.
fn run_default(config: &AppConfig) -> anyhow::Result<bool> {
    let cancel = CancelToken::new();
    let latest = MostRecentRun::new();
    let selected = SelectedRun::new();

    let monitor_handle = {
        let config = config.clone();
        let cancel = cancel.clone();
        let latest = latest.clone();
        thread::Builder::new()
            .name("save-monitor".to_string())
            .spawn(move || {
                let result = run_monitor(&config, cancel.clone(), latest);
                cancel.cancel();
                result
            })?
    };

    let db_path = config.db_path.clone();
    let show_everything = config.show_everything;
    let mut renderer = TextChartRenderer::new();
    run_reconciler(&latest, &selected, RECONCILE_INTERVAL, &cancel, |run_id| {
        info!("Showing game {}", run_id.cyan());
        let rendered = Database::open(&db_path)
            .map_err(anyhow::Error::from)
            .and_then(|db| match load_history(&db, run_id)? {
                Some(history) => Ok(renderer.render_run(&history, show_everything)?),
                None => Ok(()),
            });
        if let Err(err) = rendered {
            error!("Could not show game {}: {:#}", run_id, err);
        }
    });

    match monitor_handle.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("save monitor thread panicked"),
    }
}
