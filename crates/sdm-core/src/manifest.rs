//! App manifest (`appmanifest_<id>.acf`) reader.
//!
//! Only a handful of flat key/value fields are needed, so the file is scanned
//! with regular expressions instead of a full KeyValues parser.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::record::AppId;

lazy_static! {
    static ref NAME: Regex = field_pattern("name");
    static ref BYTES_DOWNLOADED: Regex = field_pattern("BytesDownloaded");
    static ref BYTES_TO_DOWNLOAD: Regex = field_pattern("BytesToDownload");
    static ref SIZE_ON_DISK: Regex = field_pattern("SizeOnDisk");
}

fn field_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#""{}"\s+"([^"]*)""#, regex::escape(key))).unwrap()
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed manifest {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Fields of interest from one app manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppManifest {
    pub name: String,
    pub bytes_downloaded: Option<u64>,
    pub bytes_to_download: Option<u64>,
    pub size_on_disk: Option<u64>,
}

impl AppManifest {
    /// Total size of the download: `BytesToDownload`, else `SizeOnDisk` when that is missing or 0.
    pub fn bytes_total(&self) -> Option<u64> {
        self.bytes_to_download
            .filter(|&n| n > 0)
            .or(self.size_on_disk)
    }

    /// Percent downloaded rounded to one decimal; `None` when unknown.
    pub fn progress(&self) -> Option<f64> {
        progress_percent(self.bytes_downloaded?, self.bytes_total()?)
    }

    /// Downloaded bytes reached the total (never true when the total is unknown or zero).
    pub fn is_fully_downloaded(&self) -> bool {
        match (self.bytes_downloaded, self.bytes_total()) {
            (Some(done), Some(total)) => total > 0 && done >= total,
            _ => false,
        }
    }
}

/// `round(100 * downloaded / total, 1)`, or `None` when `total` is 0.
pub fn progress_percent(downloaded: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let pct = downloaded as f64 / total as f64 * 100.0;
    Some((pct * 10.0).round() / 10.0)
}

/// Location of the manifest for `app_id` inside one library root.
pub fn manifest_path(library: &Path, app_id: AppId) -> PathBuf {
    library
        .join("steamapps")
        .join(format!("appmanifest_{}.acf", app_id))
}

/// Parse manifest text. `path` is only used for error messages.
pub fn parse_manifest(content: &str, path: &Path) -> Result<AppManifest, ManifestError> {
    let name = NAME
        .captures(content)
        .map(|c| c[1].to_string())
        .ok_or_else(|| ManifestError::Malformed {
            path: path.to_path_buf(),
            reason: "missing \"name\" field".to_string(),
        })?;

    Ok(AppManifest {
        name,
        bytes_downloaded: numeric_field(content, &BYTES_DOWNLOADED, "BytesDownloaded", path)?,
        bytes_to_download: numeric_field(content, &BYTES_TO_DOWNLOAD, "BytesToDownload", path)?,
        size_on_disk: numeric_field(content, &SIZE_ON_DISK, "SizeOnDisk", path)?,
    })
}

fn numeric_field(
    content: &str,
    pattern: &Regex,
    key: &str,
    path: &Path,
) -> Result<Option<u64>, ManifestError> {
    let Some(caps) = pattern.captures(content) else {
        return Ok(None);
    };
    caps[1]
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| ManifestError::Malformed {
            path: path.to_path_buf(),
            reason: format!("\"{}\" is not a byte count: {}", key, e),
        })
}

/// Read the manifest for `app_id` from `library`. A missing file is `Ok(None)`.
pub fn read_manifest(library: &Path, app_id: AppId) -> Result<Option<AppManifest>, ManifestError> {
    let path = manifest_path(library, app_id);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ManifestError::Io { path, source }),
    };
    parse_manifest(&content, &path).map(Some)
}

/// Search `preferred` first, then the other libraries. Errors stop the search.
pub fn find_manifest(
    libraries: &[PathBuf],
    preferred: &Path,
    app_id: AppId,
) -> Result<Option<AppManifest>, ManifestError> {
    if let Some(m) = read_manifest(preferred, app_id)? {
        return Ok(Some(m));
    }
    for lib in libraries.iter().filter(|l| l.as_path() != preferred) {
        if let Some(m) = read_manifest(lib, app_id)? {
            return Ok(Some(m));
        }
    }
    Ok(None)
}
