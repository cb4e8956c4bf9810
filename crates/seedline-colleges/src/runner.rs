//! Main runner for the college seeder

use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{
    Cell, Color, Table as SummaryTable, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

use seedline_core::{ProgressContext, Table, fmt_num, write_json_pretty};

use crate::config::Config;
use crate::division::FilterOutcome;
use crate::transform::{CollegeRecord, TransformStats, transform_colleges};

/// Rows echoed at debug level after loading
const PREVIEW_ROWS: usize = 5;

/// Pipeline execution summary
#[derive(Debug)]
pub struct Summary {
    pub stats: TransformStats,
    pub written: usize,
    pub bytes: usize,
    pub elapsed: std::time::Duration,
}

fn preview(table: &Table) {
    log::info!("Columns available: {:?}", table.columns());
    for row in table.rows().take(PREVIEW_ROWS) {
        let cells: Vec<&str> = row
            .cells()
            .iter()
            .map(|c| c.as_deref().unwrap_or("<missing>"))
            .collect();
        log::debug!("  {}", cells.join(" | "));
    }
}

/// Run the college seeder and return the records that were written.
pub fn run(config: &Config, progress: &ProgressContext) -> Result<(Summary, Vec<CollegeRecord>)> {
    let start = Instant::now();

    let csv = config
        .source
        .locate(config.preferred_file.as_deref(), progress)
        .context("Failed to locate college CSV")?;
    log::info!("Using file: {}", csv.display());

    let table = Table::from_path(&csv)
        .with_context(|| format!("Failed to load {}", csv.display()))?;
    log::info!("Dataset loaded: {} total records", fmt_num(table.len()));
    preview(&table);

    let (colleges, stats) = transform_colleges(table, config.limit, config.division);

    let bytes = write_json_pretty(&config.output_path, &colleges)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    log::info!("Saved to {}", config.output_path.display());

    let summary = Summary {
        stats,
        written: colleges.len(),
        bytes,
        elapsed: start.elapsed(),
    };
    Ok((summary, colleges))
}

/// Print a key-value summary table on stderr
pub fn print_summary(config: &Config, summary: &Summary) {
    let mut table = SummaryTable::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Colleges").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Input rows".to_string(), fmt_num(summary.stats.input_rows)]);
    match &summary.stats.division {
        Some(FilterOutcome::Filtered { column, after, .. }) => {
            table.add_row(vec![format!("Division filter ({column})"), fmt_num(*after)]);
        }
        Some(FilterOutcome::NoColumn) => {
            table.add_row(vec!["Division filter".to_string(), "skipped (no column)".to_string()]);
        }
        None => {}
    }
    if let Some(limit) = config.limit {
        table.add_row(vec!["Limit".to_string(), fmt_num(limit)]);
    }
    table.add_row(vec!["Skipped (no name/state)".to_string(), fmt_num(summary.stats.skipped_rows)]);
    table.add_row(vec!["Written".to_string(), fmt_num(summary.written)]);
    table.add_row(vec!["Output".to_string(), config.output_path.display().to_string()]);
    table.add_row(vec!["Bytes".to_string(), fmt_num(summary.bytes)]);
    table.add_row(vec!["Time".to_string(), format!("{:.1}s", summary.elapsed.as_secs_f64())]);

    eprintln!("\n{table}");
}
