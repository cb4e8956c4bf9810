//! Main runner for the sports seeder

use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{
    Cell, CellAlignment, Color, Table as SummaryTable,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

use seedline_core::{ProgressContext, Table, fmt_num, write_json_pretty};

use crate::aggregate::{SPORTS_COLUMN, SportRecord, aggregate_sports};
use crate::config::Config;

/// Sports shown in the closing table
const TOP_N: usize = 10;

/// Pipeline execution summary
#[derive(Debug)]
pub struct Summary {
    pub input_rows: usize,
    pub processed_rows: usize,
    /// Rows with a present `sports` value
    pub counted_rows: usize,
    pub bytes: usize,
    pub elapsed: std::time::Duration,
}

/// Run the sports seeder and return the records that were written.
pub fn run(config: &Config, progress: &ProgressContext) -> Result<(Summary, Vec<SportRecord>)> {
    let start = Instant::now();

    let csv = config
        .source
        .locate(None, progress)
        .context("Failed to locate sports CSV")?;
    log::info!("Using file: {}", csv.display());

    let mut table = Table::from_path(&csv)
        .with_context(|| format!("Failed to load {}", csv.display()))?;
    let input_rows = table.len();
    log::info!("Total records: {}", fmt_num(input_rows));

    if let Some(limit) = config.limit {
        table = table.head(limit);
        log::info!("Limited to first {limit} records");
    }

    let values = table
        .column_values(SPORTS_COLUMN)
        .with_context(|| format!("{} has no '{SPORTS_COLUMN}' column", csv.display()))?;
    let counted_rows = values.iter().flatten().count();

    let sports = aggregate_sports(&values);
    log::info!("Extracted {} unique sports", sports.len());

    let bytes = write_json_pretty(&config.output_path, &sports)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    log::info!("Saved to {}", config.output_path.display());

    let summary = Summary {
        input_rows,
        processed_rows: table.len(),
        counted_rows,
        bytes,
        elapsed: start.elapsed(),
    };
    Ok((summary, sports))
}

/// Print the most popular sports on stderr
pub fn print_top_sports(sports: &[SportRecord]) {
    let mut table = SummaryTable::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Sport").fg(Color::Cyan),
            Cell::new("Programs").fg(Color::Cyan),
        ]);

    for (i, sport) in sports.iter().take(TOP_N).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&sport.name),
            Cell::new(sport.popularity).set_alignment(CellAlignment::Right),
        ]);
    }

    eprintln!("\nTop {TOP_N} sports by popularity:\n{table}");
}
