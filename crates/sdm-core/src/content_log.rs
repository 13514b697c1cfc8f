//! Hints scraped from Steam's `logs/content_log.txt`.
//!
//! The log is free-form; only lines that mention a download and an app id are
//! used. They may carry a rate (`12.5 MB/s`), a percentage, or the
//! `download <done>/<total>` byte counters Steam prints when an update starts.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::manifest::progress_percent;
use crate::record::AppId;

/// Lines read from the end of the newest content log.
pub const DEFAULT_TAIL_LINES: usize = 100;

/// Bytes read from the end of the log per requested line.
const BYTES_PER_TAIL_LINE: u64 = 1024;

lazy_static! {
    static ref APP_ID: Regex = Regex::new(r"(?i)app[_\s]?id[\s:=]+(\d+)").unwrap();
    static ref RATE: Regex = Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(kb|mb|gb)/s").unwrap();
    static ref PERCENT: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap();
    static ref COUNTERS: Regex = Regex::new(r"(?i)download\s+(\d+)\s*/\s*(\d+)").unwrap();
}

/// What the log says about one app.
#[derive(Debug, Clone, PartialEq)]
pub struct LogHint {
    pub app_id: AppId,
    pub bytes_per_sec: Option<f64>,
    pub progress: Option<f64>,
}

/// Parse one log line; `None` unless it mentions a download and an app id.
pub fn parse_line(line: &str) -> Option<LogHint> {
    if !line.to_ascii_lowercase().contains("download") {
        return None;
    }
    let app_id = APP_ID.captures(line)?[1].parse::<AppId>().ok()?;

    let bytes_per_sec = RATE.captures(line).and_then(|c| {
        let value: f64 = c[1].parse().ok()?;
        let unit = match c[2].to_ascii_lowercase().as_str() {
            "kb" => 1024.0,
            "mb" => 1024.0 * 1024.0,
            _ => 1024.0 * 1024.0 * 1024.0,
        };
        Some(value * unit)
    });

    let progress = PERCENT
        .captures(line)
        .and_then(|c| c[1].parse::<f64>().ok())
        .or_else(|| {
            let c = COUNTERS.captures(line)?;
            progress_percent(c[1].parse().ok()?, c[2].parse().ok()?)
        });

    Some(LogHint {
        app_id,
        bytes_per_sec,
        progress,
    })
}

/// Merge hints from `lines` in order; later values replace earlier ones per field.
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<LogHint> {
    let mut by_app: BTreeMap<AppId, LogHint> = BTreeMap::new();
    for hint in lines.into_iter().filter_map(parse_line) {
        by_app
            .entry(hint.app_id)
            .and_modify(|h| {
                if hint.bytes_per_sec.is_some() {
                    h.bytes_per_sec = hint.bytes_per_sec;
                }
                if hint.progress.is_some() {
                    h.progress = hint.progress;
                }
            })
            .or_insert(hint);
    }
    by_app.into_values().collect()
}

/// Newest `content_log*.txt` / `content_log*.log` under `<root>/logs`.
pub fn latest_content_log(root: &Path) -> io::Result<Option<PathBuf>> {
    let logs = root.join("logs");
    let entries = match fs::read_dir(&logs) {
        Ok(e) => e,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_content_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("content_log"))
            .unwrap_or(false);
        let ext_ok = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("log")
        );
        if !is_content_log || !ext_ok {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, p)| p))
}

/// Hints from the last `tail_lines` lines of the newest content log. Any read
/// failure yields no hints.
pub fn scan_content_log(root: &Path, tail_lines: usize) -> Vec<LogHint> {
    let path = match latest_content_log(root) {
        Ok(Some(p)) => p,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::debug!("could not list logs under {}: {}", root.display(), e);
            return Vec::new();
        }
    };
    let text = match read_tail(&path, tail_lines) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("could not read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(tail_lines);
    parse_lines(lines[start..].iter().copied())
}

/// The end of `path`, at most `tail_lines` KiB of it, starting on a line boundary.
pub fn read_tail(path: &Path, tail_lines: usize) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let len = file.metadata()?.len();
    let window = (tail_lines as u64).saturating_mul(BYTES_PER_TAIL_LINE);
    let offset = len.saturating_sub(window);
    // One byte early, so a window that starts on a line boundary keeps that line.
    let start = offset.saturating_sub(1);
    file.seek(SeekFrom::Start(start))?;

    let mut bytes = Vec::with_capacity((len - start) as usize);
    file.take(len - start).read_to_end(&mut bytes)?;
    if offset > 0 {
        match bytes.iter().position(|&b| b == b'\n') {
            Some(nl) => {
                bytes.drain(..=nl);
            }
            None => bytes.clear(),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
