//! Sports seeder configuration

use std::path::PathBuf;

use seedline_core::DataSource;

/// Default dataset slug
pub const DEFAULT_DATASET: &str = "umerhaddii/us-collegiate-sports-dataset";

/// Runtime configuration for the sports seeder
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the table comes from; the first CSV found is used
    pub source: DataSource,
    /// Output path for `sports.json`
    pub output_path: PathBuf,
    /// Aggregate only the first N rows
    pub limit: Option<usize>,
}

impl Config {
    pub fn local(input: impl Into<PathBuf>) -> Self {
        Self {
            source: DataSource::Local(input.into()),
            output_path: PathBuf::from("data/sports.json"),
            limit: None,
        }
    }
}
