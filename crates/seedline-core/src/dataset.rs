//! Dataset acquisition: Kaggle-style slug → local directory of CSV files.
//!
//! Cache layout:
//! ```text
//! {cache_dir}/
//! └── {owner}/
//!     └── {name}/
//!         ├── .complete        # written last; its presence means "usable"
//!         └── *.csv            # extracted archive contents
//! ```

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use zip::ZipArchive;

use crate::error::DatasetError;
use crate::http::{self, BasicAuth};
use crate::progress::ProgressContext;

const COMPLETE_MARKER: &str = ".complete";
const ARCHIVE_TMP: &str = "archive.zip.tmp";
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Default download API root
pub const KAGGLE_BASE_URL: &str = "https://www.kaggle.com/api/v1/";

/// A dataset identified by `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub owner: String,
    pub name: String,
}

impl DatasetRef {
    pub fn parse(slug: &str) -> Result<Self, DatasetError> {
        let invalid = || DatasetError::InvalidSlug(slug.to_string());
        let (owner, name) = slug.trim().split_once('/').ok_or_else(invalid)?;
        let valid_part = |s: &str| {
            !s.is_empty()
                && s != "."
                && s != ".."
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Contents of a `kaggle.json` API token file.
#[derive(Debug, Clone, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl KaggleCredentials {
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(io::Error::other)
    }
}

impl From<KaggleCredentials> for BasicAuth {
    fn from(c: KaggleCredentials) -> Self {
        BasicAuth {
            username: c.username,
            password: c.key,
        }
    }
}

/// Downloads datasets once and serves them from the cache afterwards.
#[derive(Debug, Clone)]
pub struct DatasetDownloader {
    base_url: String,
    auth: Option<BasicAuth>,
    cache_dir: PathBuf,
}

impl DatasetDownloader {
    pub fn new(base_url: impl Into<String>, auth: Option<BasicAuth>, cache_dir: PathBuf) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            auth,
            cache_dir,
        }
    }

    pub fn download_url(&self, dataset: &DatasetRef) -> String {
        format!(
            "{}datasets/download/{}/{}",
            self.base_url, dataset.owner, dataset.name
        )
    }

    pub fn dataset_dir(&self, dataset: &DatasetRef) -> PathBuf {
        self.cache_dir.join(&dataset.owner).join(&dataset.name)
    }

    pub fn is_cached(&self, dataset: &DatasetRef) -> bool {
        self.dataset_dir(dataset).join(COMPLETE_MARKER).exists()
    }

    /// Return a local directory holding the dataset, downloading it if needed.
    ///
    /// A half-written cache entry (no marker) is discarded and fetched again.
    pub fn fetch(
        &self,
        dataset: &DatasetRef,
        progress: &ProgressContext,
    ) -> Result<PathBuf, DatasetError> {
        let dir = self.dataset_dir(dataset);
        if self.is_cached(dataset) {
            log::info!("{dataset}: using cached copy at {}", dir.display());
            return Ok(dir);
        }

        if dir.exists() {
            log::debug!("{dataset}: removing incomplete cache entry");
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        let archive = dir.join(ARCHIVE_TMP);
        let url = self.download_url(dataset);
        log::info!("Downloading {dataset}...");
        if self.auth.is_none() {
            log::debug!("{dataset}: no credentials configured, trying anonymous download");
        }

        let pb = progress.download_bar(&dataset.slug());
        let bytes = http::download_to_file(&url, self.auth.as_ref(), &archive, &pb);
        pb.finish_and_clear();
        let bytes = match bytes {
            Ok(n) => n,
            Err(e) => {
                if e.is_unauthorized() {
                    log::error!(
                        "{dataset}: download refused; set KAGGLE_USERNAME/KAGGLE_KEY or ~/.kaggle/kaggle.json"
                    );
                }
                return Err(e.into());
            }
        };
        log::debug!("{dataset}: {bytes} bytes downloaded");

        let files = if is_zip(&archive)? {
            let n = extract_archive(&archive, &dir)?;
            fs::remove_file(&archive)?;
            n
        } else {
            // Single-file datasets may come back unwrapped
            fs::rename(&archive, dir.join(format!("{}.csv", dataset.name)))?;
            1
        };

        File::create(dir.join(COMPLETE_MARKER))?;
        log::info!("{dataset}: {files} file(s) stored in {}", dir.display());
        Ok(dir)
    }
}

fn is_zip(path: &Path) -> io::Result<bool> {
    let mut magic = [0u8; 4];
    let mut file = File::open(path)?;
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == ZIP_MAGIC),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Unpack every file entry of a zip archive under `dest`.
///
/// Entries whose names would escape `dest` are skipped. Returns the number
/// of files written.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize, DatasetError> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let mut written = 0;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            log::warn!("skipping unsafe archive entry: {}", entry.name());
            continue;
        };
        let out = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&out)?;
        io::copy(&mut entry, &mut file)?;
        written += 1;
    }

    Ok(written)
}

/// All `*.csv` files below `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let pattern = format!("{}/**/*.csv", glob::Pattern::escape(&dir.display().to_string()));
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).map_err(io::Error::other)? {
        files.push(entry.map_err(io::Error::from)?);
    }
    files.sort();
    if files.is_empty() {
        return Err(DatasetError::NoCsvFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Pick the file named `preferred` (case-insensitive), else the first one.
pub fn pick_csv<'a>(files: &'a [PathBuf], preferred: Option<&str>) -> Option<&'a PathBuf> {
    preferred
        .and_then(|want| {
            files.iter().find(|f| {
                f.file_name()
                    .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(want))
            })
        })
        .or_else(|| files.first())
}

/// Resolve a user-supplied path: a file is used as-is, a directory is
/// searched for CSV files.
pub fn resolve_csv(path: &Path, preferred: Option<&str>) -> Result<PathBuf, DatasetError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let files = find_csv_files(path)?;
    log::info!("Found {} CSV file(s) in {}", files.len(), path.display());
    for (i, f) in files.iter().enumerate() {
        log::debug!("  {}. {}", i + 1, f.display());
    }
    pick_csv(&files, preferred)
        .cloned()
        .ok_or_else(|| DatasetError::NoCsvFiles(path.to_path_buf()))
}

/// Where a pipeline reads its CSV from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A CSV file, or a directory searched for one
    Local(PathBuf),
    /// A remote dataset, downloaded (or served from cache) on demand
    Remote {
        dataset: DatasetRef,
        downloader: DatasetDownloader,
    },
}

impl DataSource {
    /// Produce the path of the CSV file to load.
    pub fn locate(
        &self,
        preferred: Option<&str>,
        progress: &ProgressContext,
    ) -> Result<PathBuf, DatasetError> {
        match self {
            Self::Local(path) => resolve_csv(path, preferred),
            Self::Remote {
                dataset,
                downloader,
            } => {
                let dir = downloader.fetch(dataset, progress)?;
                log::info!("Dataset available at {}", dir.display());
                resolve_csv(&dir, preferred)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread::JoinHandle;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("body.zip");
        write_zip(&path, entries);
        fs::read(path).unwrap()
    }

    /// Serve one HTTP response with `body`; the handle yields the request head.
    fn serve_once(body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api/v1/", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (base_url, handle)
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn parse_slug() {
        let ds = DatasetRef::parse("flynn28/college-division-database").unwrap();
        assert_eq!(ds.owner, "flynn28");
        assert_eq!(ds.name, "college-division-database");
        assert_eq!(ds.slug(), "flynn28/college-division-database");
    }

    #[test]
    fn parse_slug_rejects_garbage() {
        assert!(DatasetRef::parse("no-slash").is_err());
        assert!(DatasetRef::parse("/name").is_err());
        assert!(DatasetRef::parse("owner/").is_err());
        assert!(DatasetRef::parse("a/b/c").is_err());
        assert!(DatasetRef::parse("../etc").is_err());
    }

    #[test]
    fn download_url_and_cache_dir() {
        let dl = DatasetDownloader::new("https://example.test/api/v1", None, "/cache".into());
        let ds = DatasetRef::parse("owner/data").unwrap();
        assert_eq!(
            dl.download_url(&ds),
            "https://example.test/api/v1/datasets/download/owner/data"
        );
        assert_eq!(dl.dataset_dir(&ds), PathBuf::from("/cache/owner/data"));
    }

    #[test]
    fn cached_dataset_is_served_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        // Unroutable base URL: any network attempt would fail the test
        let dl = DatasetDownloader::new("http://127.0.0.1:9/", None, tmp.path().to_path_buf());
        let ds = DatasetRef::parse("owner/data").unwrap();
        let dir = dl.dataset_dir(&ds);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("data.csv"), "a\n1\n").unwrap();
        File::create(dir.join(COMPLETE_MARKER)).unwrap();

        assert!(dl.is_cached(&ds));
        let got = dl.fetch(&ds, &ProgressContext::hidden()).unwrap();
        assert_eq!(got, dir);
    }

    #[test]
    fn failed_download_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dl = DatasetDownloader::new("http://127.0.0.1:9/", None, tmp.path().to_path_buf());
        let ds = DatasetRef::parse("owner/data").unwrap();
        let err = dl.fetch(&ds, &ProgressContext::hidden()).unwrap_err();
        assert!(matches!(err, DatasetError::Http(_)));
        assert!(!dl.is_cached(&ds));
    }

    #[test]
    fn fetch_extracts_zip_body() {
        let tmp = tempfile::tempdir().unwrap();
        let body = zip_bytes(&[("Colleges.csv", "Name,State\nKenyon College,OH\n")]);
        let (base_url, server) = serve_once(body);
        let auth = BasicAuth {
            username: "coach".to_string(),
            password: "k3y".to_string(),
        };
        let dl = DatasetDownloader::new(base_url, Some(auth), tmp.path().to_path_buf());
        let ds = DatasetRef::parse("owner/colleges").unwrap();

        let dir = dl.fetch(&ds, &ProgressContext::hidden()).unwrap();
        let head = server.join().unwrap();

        assert!(head.starts_with("GET /api/v1/datasets/download/owner/colleges HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("authorization: basic "));
        assert_eq!(dir, dl.dataset_dir(&ds));
        assert_eq!(dir_entries(&dir), vec![".complete", "Colleges.csv"]);
        assert_eq!(
            fs::read_to_string(dir.join("Colleges.csv")).unwrap(),
            "Name,State\nKenyon College,OH\n"
        );
        assert!(dl.is_cached(&ds));
    }

    #[test]
    fn fetch_stores_plain_body_as_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let (base_url, server) = serve_once(b"sports\nSoccer\nRowing\n".to_vec());
        let dl = DatasetDownloader::new(base_url, None, tmp.path().to_path_buf());
        let ds = DatasetRef::parse("owner/sports-data").unwrap();

        let dir = dl.fetch(&ds, &ProgressContext::hidden()).unwrap();
        let head = server.join().unwrap();

        assert!(!head.to_ascii_lowercase().contains("authorization:"));
        assert_eq!(dir_entries(&dir), vec![".complete", "sports-data.csv"]);
        assert_eq!(
            fs::read_to_string(dir.join("sports-data.csv")).unwrap(),
            "sports\nSoccer\nRowing\n"
        );
    }

    #[test]
    fn fetch_replaces_incomplete_cache_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let (base_url, server) = serve_once(zip_bytes(&[("fresh.csv", "a\n1\n")]));
        let dl = DatasetDownloader::new(base_url, None, tmp.path().to_path_buf());
        let ds = DatasetRef::parse("owner/data").unwrap();
        let dir = dl.dataset_dir(&ds);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.csv"), "old\n").unwrap();
        fs::write(dir.join(ARCHIVE_TMP), "partial").unwrap();
        assert!(!dl.is_cached(&ds));

        dl.fetch(&ds, &ProgressContext::hidden()).unwrap();
        server.join().unwrap();

        assert_eq!(dir_entries(&dir), vec![".complete", "fresh.csv"]);
    }

    #[test]
    fn extract_nested_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("a.zip");
        write_zip(
            &archive,
            &[("Colleges.csv", "Name\nX\n"), ("extra/Conferences.csv", "c\n1\n")],
        );
        let out = tmp.path().join("out");
        let n = extract_archive(&archive, &out).unwrap();
        assert_eq!(n, 2);
        assert!(out.join("Colleges.csv").is_file());
        assert!(out.join("extra/Conferences.csv").is_file());
        assert!(is_zip(&archive).unwrap());
        assert!(!is_zip(&out.join("Colleges.csv")).unwrap());
    }

    #[test]
    fn find_csv_files_sorted_and_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("b.csv"), "").unwrap();
        fs::write(tmp.path().join("sub/a.csv"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();

        let files = find_csv_files(tmp.path()).unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("b.csv"), tmp.path().join("sub/a.csv")]
        );
    }

    #[test]
    fn find_csv_files_empty_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_csv_files(tmp.path()).unwrap_err();
        assert!(matches!(err, DatasetError::NoCsvFiles(_)));
    }

    #[test]
    fn pick_prefers_named_file_case_insensitively() {
        let files = vec![PathBuf::from("d/Conferences.csv"), PathBuf::from("d/Colleges.csv")];
        assert_eq!(
            pick_csv(&files, Some("colleges.csv")),
            Some(&PathBuf::from("d/Colleges.csv"))
        );
        assert_eq!(
            pick_csv(&files, Some("missing.csv")),
            Some(&PathBuf::from("d/Conferences.csv"))
        );
        assert_eq!(pick_csv(&files, None), Some(&PathBuf::from("d/Conferences.csv")));
        assert_eq!(pick_csv(&[], None), None);
    }

    #[test]
    fn resolve_csv_accepts_file_or_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Colleges.csv");
        fs::write(&file, "Name\n").unwrap();
        assert_eq!(resolve_csv(&file, None).unwrap(), file);
        assert_eq!(resolve_csv(tmp.path(), Some("colleges.csv")).unwrap(), file);
    }

    #[test]
    fn remote_source_uses_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let downloader =
            DatasetDownloader::new("http://127.0.0.1:9/", None, tmp.path().to_path_buf());
        let dataset = DatasetRef::parse("owner/sports").unwrap();
        let dir = downloader.dataset_dir(&dataset);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("sports.csv"), "sports\nSoccer\n").unwrap();
        File::create(dir.join(COMPLETE_MARKER)).unwrap();

        let source = DataSource::Remote {
            dataset,
            downloader,
        };
        let csv = source.locate(None, &ProgressContext::hidden()).unwrap();
        assert_eq!(csv, dir.join("sports.csv"));
    }

    #[test]
    fn credentials_from_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("kaggle.json");
        fs::write(&path, r#"{"username":"u","key":"k"}"#).unwrap();
        let auth: BasicAuth = KaggleCredentials::from_json_file(&path).unwrap().into();
        assert_eq!(auth.username, "u");
        assert_eq!(auth.password, "k");
    }
}
