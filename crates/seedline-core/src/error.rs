//! Error type for dataset acquisition

use std::path::PathBuf;

use crate::http::HttpError;

/// Error from resolving, downloading or unpacking a dataset.
///
/// None of these are retried; callers treat every variant as fatal.
#[derive(Debug)]
pub enum DatasetError {
    /// Slug was not of the form `owner/name`
    InvalidSlug(String),
    /// Download failed
    Http(HttpError),
    /// Local filesystem error
    Io(std::io::Error),
    /// Downloaded archive could not be read
    Archive(zip::result::ZipError),
    /// Dataset contains no `.csv` files
    NoCsvFiles(PathBuf),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlug(s) => write!(f, "invalid dataset slug '{s}' (expected owner/name)"),
            Self::Http(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "IO: {e}"),
            Self::Archive(e) => write!(f, "archive: {e}"),
            Self::NoCsvFiles(dir) => write!(f, "No CSV files found in {}", dir.display()),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Archive(e) => Some(e),
            Self::InvalidSlug(_) | Self::NoCsvFiles(_) => None,
        }
    }
}

impl From<HttpError> for DatasetError {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<zip::result::ZipError> for DatasetError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e)
    }
}
