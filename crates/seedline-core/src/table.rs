//! In-memory CSV table with labelled columns.
//!
//! Every cell is `Option<String>`; `None` is the one missing-value marker.
//! Empty fields and the usual spreadsheet/dataframe NA spellings are folded
//! into `None` at load time, so downstream code never compares against
//! sentinel strings.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Raw field values treated as missing.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single table cell.
pub type Cell = Option<String>;

fn normalize_cell(raw: &[u8]) -> Cell {
    let text = String::from_utf8_lossy(raw);
    if MISSING_MARKERS.contains(&text.as_ref()) {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Errors from loading or querying a table
#[derive(Debug)]
pub enum TableError {
    Io(io::Error),
    Csv(csv::Error),
    MissingColumn(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO: {e}"),
            Self::Csv(e) => write!(f, "CSV: {e}"),
            Self::MissingColumn(c) => write!(f, "column '{c}' not found"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<io::Error> for TableError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Column labels plus rows of cells, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table directly. Rows are padded/truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, None);
                r
            })
            .collect();
        Self { columns, rows }
    }

    /// Load a CSV file; the first record is the header.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader; the first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let label = String::from_utf8_lossy(h);
                if i == 0 {
                    label.trim_start_matches('\u{feff}').to_string()
                } else {
                    label.into_owned()
                }
            })
            .collect();
        let width = columns.len();

        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            if record.len() > width {
                log::debug!(
                    "line {}: {} fields, header has {width}; extra fields dropped",
                    record.position().map_or(0, |p| p.line()),
                    record.len()
                );
            }
            let mut row: Vec<Cell> = record.iter().take(width).map(normalize_cell).collect();
            row.resize(width, None);
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.column_index(label).is_some()
    }

    /// Position of the column with exactly this label (case-sensitive).
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|cells| Row {
            table: self,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            table: self,
            cells,
        })
    }

    /// Keep only the first `n` rows.
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Keep rows for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&[Cell]) -> bool) {
        self.rows.retain(|cells| keep(cells));
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, label: &str) -> Result<Vec<Option<&str>>, TableError> {
        let idx = self
            .column_index(label)
            .ok_or_else(|| TableError::MissingColumn(label.to_string()))?;
        Ok(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell under `label`; `None` when the column is absent or the cell is missing.
    pub fn get(&self, label: &str) -> Option<&'a str> {
        let idx = self.table.column_index(label)?;
        let cells: &'a [Cell] = self.cells;
        cells[idx].as_deref()
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}
