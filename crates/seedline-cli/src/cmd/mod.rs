//! Subcommand implementations

pub mod colleges;
pub mod sports;
pub mod token;

use std::path::PathBuf;

use anyhow::{Context, Result};

use seedline_core::{DataSource, DatasetRef};

use crate::config::KaggleConfig;

/// `--input` wins; otherwise the dataset slug is fetched through the cache.
fn data_source(input: Option<PathBuf>, slug: &str, kaggle: &KaggleConfig) -> Result<DataSource> {
    if let Some(path) = input {
        return Ok(DataSource::Local(path));
    }
    let dataset = DatasetRef::parse(slug).with_context(|| format!("Bad dataset slug '{slug}'"))?;
    Ok(DataSource::Remote {
        dataset,
        downloader: kaggle.downloader(),
    })
}
