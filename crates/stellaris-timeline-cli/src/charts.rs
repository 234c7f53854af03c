use chrono::DateTime;
use colored::*;
use stellaris_timeline_core::names::{color, Rgb};
use stellaris_timeline_core::storage::models::SnapshotRecord;
use stellaris_timeline_core::visualize::{ChartRenderer, RunHistory};
use stellaris_timeline_core::Error;

const BAR_WIDTH: usize = 40;
/// Snapshots shown per game unless everything was requested.
const RECENT_SNAPSHOTS: usize = 10;
const PALETTE: &[&str] = &[
    "intense_blue",
    "intense_red",
    "frog_green",
    "intense_orange",
    "bright_purple",
    "ice_turquoise",
    "bright_yellow",
    "intense_pink",
];

/// Draws save histories as bar charts on the terminal.
#[derive(Default)]
pub struct TextChartRenderer;

impl TextChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render_run(&mut self, history: &RunHistory, show_everything: bool) -> Result<(), Error> {
        let rgb = palette_color(0);
        print_header(history, rgb);

        let snapshots = &history.snapshots;
        let shown = if show_everything || snapshots.len() <= RECENT_SNAPSHOTS {
            &snapshots[..]
        } else {
            println!(
                "  {}",
                format!("... {} older saves", snapshots.len() - RECENT_SNAPSHOTS).dimmed()
            );
            &snapshots[snapshots.len() - RECENT_SNAPSHOTS..]
        };

        let max_size = shown.iter().map(|s| s.file_size).max().unwrap_or(0);
        for snapshot in shown {
            println!(
                "  {}  {}  {:>9}",
                format_timestamp(snapshot.last_modified),
                bar(snapshot.file_size, max_size, rgb),
                format_size(snapshot.file_size)
            );
            if show_everything {
                println!("    {}", snapshot.archive_path.dimmed());
            }
        }
        println!();
        Ok(())
    }

    fn render_comparison(
        &mut self,
        comparison_id: &str,
        histories: &[RunHistory],
        show_everything: bool,
    ) -> Result<(), Error> {
        println!(
            "{} {}",
            "Comparing games matching".bold(),
            format!("\"{}\"", comparison_id).cyan()
        );

        let max_count = histories
            .iter()
            .map(|h| h.snapshots.len() as i64)
            .max()
            .unwrap_or(0);
        for (index, history) in histories.iter().enumerate() {
            let rgb = palette_color(index);
            let span = span(&history.snapshots);
            println!(
                "  {:<40} {} {:>5} saves  {}",
                history.run.name.truecolor(rgb.r, rgb.g, rgb.b),
                bar(history.snapshots.len() as i64, max_count, rgb),
                history.snapshots.len(),
                span.dimmed()
            );
            if show_everything {
                if let Some(last) = &history.run.last_ingested_at {
                    println!("    last recorded {}", last.dimmed());
                }
            }
        }
        println!();
        Ok(())
    }
}

fn print_header(history: &RunHistory, rgb: Rgb) {
    println!(
        "{} ({} saves)",
        history.run.name.truecolor(rgb.r, rgb.g, rgb.b).bold(),
        history.snapshots.len()
    );
}

fn palette_color(index: usize) -> Rgb {
    color(PALETTE[index % PALETTE.len()]).unwrap_or(Rgb::new(200, 200, 200))
}

fn bar(value: i64, max: i64, rgb: Rgb) -> String {
    let filled = if max > 0 {
        ((value.max(0) as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled).truecolor(rgb.r, rgb.g, rgb.b),
        "·".repeat(BAR_WIDTH - filled).dimmed()
    )
}

fn span(snapshots: &[SnapshotRecord]) -> String {
    match (snapshots.first(), snapshots.last()) {
        (Some(first), Some(last)) => format!(
            "{} → {}",
            format_timestamp(first.last_modified),
            format_timestamp(last.last_modified)
        ),
        _ => "no saves".to_string(),
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn format_size(bytes: i64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }

    #[test]
    fn test_palette_colors_exist() {
        for name in PALETTE {
            assert!(color(name).is_some(), "{} missing", name);
        }
    }
}
