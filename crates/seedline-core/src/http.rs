//! Blocking HTTP downloads on top of the shared async client.
//!
//! Uses async reqwest internally but presents a sync interface, since every
//! pipeline here runs to completion on a single thread.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use indicatif::ProgressBar;

use crate::progress::upgrade_to_bar;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for download operations
#[derive(Debug)]
pub enum HttpError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// I/O error while writing the body to disk
    Io(io::Error),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so credentials in query strings never reach the logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    /// True when the server refused the credentials (or demanded some).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Http {
                status: Some(401 | 403),
                ..
            }
        )
    }
}

impl From<io::Error> for HttpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Basic-auth credentials for a download.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("seedline/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP GET `url` and stream the body into `dest`.
///
/// The request is attempted exactly once. `pb` switches from its pending
/// style to a byte bar once `Content-Length` is known.
///
/// Returns the number of body bytes written.
pub fn download_to_file(
    url: &str,
    auth: Option<&BasicAuth>,
    dest: &Path,
    pb: &ProgressBar,
) -> Result<u64, HttpError> {
    let mut file = File::create(dest)?;

    let written = SHARED_RUNTIME.block_on(async {
        let mut request = SHARED_CLIENT.get(url);
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let mut response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(HttpError::from_reqwest)?;

        if let Some(total) = response.content_length() {
            upgrade_to_bar(pb, total);
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(HttpError::from_reqwest)? {
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
            pb.set_position(written);
        }
        Ok::<_, HttpError>(written)
    })?;

    file.flush()?;
    Ok(written)
}
