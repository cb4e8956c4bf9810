//! College seeder configuration

use std::path::PathBuf;

use seedline_core::DataSource;

use crate::division::Division;

/// Default dataset slug
pub const DEFAULT_DATASET: &str = "flynn28/college-division-database";

/// CSV preferred when the dataset ships several files
pub const DEFAULT_FILE: &str = "colleges.csv";

/// Runtime configuration for the college seeder
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the table comes from
    pub source: DataSource,
    /// CSV file name to prefer inside a dataset directory (case-insensitive)
    pub preferred_file: Option<String>,
    /// Output path for `colleges.json`
    pub output_path: PathBuf,
    /// Keep only the first N rows (after division filtering)
    pub limit: Option<usize>,
    /// Keep only rows of this NCAA division
    pub division: Option<Division>,
}

impl Config {
    /// Configuration reading a local CSV file or directory, other fields default.
    pub fn local(input: impl Into<PathBuf>) -> Self {
        Self {
            source: DataSource::Local(input.into()),
            preferred_file: Some(DEFAULT_FILE.to_string()),
            output_path: PathBuf::from("data/colleges.json"),
            limit: None,
            division: None,
        }
    }
}
