//! JSON fixture writer with atomic tmp→rename

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as 2-space indented JSON and write it to `path`.
///
/// The whole document is rendered in memory, written to a `.tmp` sibling in
/// one call, then renamed over the destination. Missing parent directories
/// are created. Returns the number of bytes written.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<usize> {
    let buf = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, path)?;
    Ok(buf.len())
}
