//! Seedline Core - shared plumbing for the seed-data pipelines
//!
//! Dataset download and caching, CSV table loading, JSON fixture output,
//! logging and progress reporting.

pub mod dataset;
pub mod error;
pub mod http;
pub mod logging;
pub mod output;
pub mod progress;
pub mod table;

// Re-exports for convenience
pub use dataset::{
    DataSource, DatasetDownloader, DatasetRef, KAGGLE_BASE_URL, KaggleCredentials, find_csv_files,
    pick_csv, resolve_csv,
};
pub use error::DatasetError;
pub use http::{BasicAuth, HttpError};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use output::write_json_pretty;
pub use progress::{ProgressContext, fmt_num};
pub use table::{Cell, Row, Table, TableError};
