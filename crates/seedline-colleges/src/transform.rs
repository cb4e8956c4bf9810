//! Table → college records

use serde::{Deserialize, Serialize};

use seedline_core::{Row, Table};

use crate::columns::{self, Field};
use crate::division::{self, Division, FilterOutcome};

/// One entry of `colleges.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeRecord {
    pub name: String,
    pub state: String,
    pub city: String,
    pub website: String,
    pub conference: String,
    pub division_rank: u8,
}

/// Build a record from one row, or `None` if name or state is unresolvable.
pub fn extract_college(row: &Row<'_>, division_rank: u8) -> Option<CollegeRecord> {
    let name = columns::resolve(row, Field::Name)?;
    let (city, state) = columns::resolve_place(row);
    let state = state?;
    let website = columns::resolve(row, Field::Website).map(columns::normalize_website);
    let conference = columns::resolve(row, Field::Conference);

    Some(CollegeRecord {
        name: name.to_string(),
        state: state.to_string(),
        city: city.unwrap_or_default().to_string(),
        website: website.unwrap_or_default(),
        conference: conference.unwrap_or_default().to_string(),
        division_rank,
    })
}

/// Counts collected while transforming a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub input_rows: usize,
    /// `None` when no division filter was requested
    pub division: Option<FilterOutcome>,
    pub processed_rows: usize,
    pub skipped_rows: usize,
}

/// Division filter → row limit → per-row extraction, preserving row order.
pub fn transform_colleges(
    mut table: Table,
    limit: Option<usize>,
    division: Option<Division>,
) -> (Vec<CollegeRecord>, TransformStats) {
    let mut stats = TransformStats {
        input_rows: table.len(),
        ..Default::default()
    };

    if let Some(division) = division {
        stats.division = Some(division::filter_by_division(&mut table, division));
    }
    log::info!("Total records after filtering: {}", table.len());

    if let Some(limit) = limit {
        table = table.head(limit);
        log::info!("Limited to first {limit} records");
    }
    stats.processed_rows = table.len();

    let rank = division.map_or(1, Division::number);
    let colleges: Vec<CollegeRecord> = table
        .rows()
        .filter_map(|row| extract_college(&row, rank))
        .collect();
    stats.skipped_rows = stats.processed_rows - colleges.len();

    log::info!("Transformed {} colleges", colleges.len());
    if stats.skipped_rows > 0 {
        log::debug!("{} rows lacked a name or state", stats.skipped_rows);
    }
    (colleges, stats)
}
