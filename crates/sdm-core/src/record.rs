//! Types shared by the estimator, the monitor and the CLI report.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Steam app identifier (the numeric name of a staging folder / manifest).
pub type AppId = u32;

/// One size sample of a staging folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadObservation {
    pub timestamp: Instant,
    /// Cumulative bytes in the staging folder at `timestamp`.
    pub bytes: u64,
}

/// Status derived from the latest speed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadStatus {
    Downloading,
    Paused,
    Starting,
    Checking,
    Idle,
    Completed,
}

impl DownloadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Paused => "paused",
            DownloadStatus::Starting => "starting",
            DownloadStatus::Checking => "checking",
            DownloadStatus::Idle => "idle",
            DownloadStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimator output for one observation. `bytes_per_sec` is never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    pub bytes_per_sec: f64,
    pub status: DownloadStatus,
}

impl SpeedSample {
    pub fn idle(status: DownloadStatus) -> Self {
        Self {
            bytes_per_sec: 0.0,
            status,
        }
    }
}

/// One line of the per-tick report.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRecord {
    pub app_id: AppId,
    pub name: String,
    pub status: DownloadStatus,
    /// Estimated throughput from staging folder growth.
    pub bytes_per_sec: f64,
    /// Percentage in 0..=100 (not clamped), `None` when unknown.
    pub progress: Option<f64>,
    pub bytes_downloaded: Option<u64>,
    pub bytes_total: Option<u64>,
    /// Speed Steam itself wrote to the content log, if any.
    pub reported_bytes_per_sec: Option<f64>,
    /// Library root the staging folder was found in.
    pub library: PathBuf,
}

/// Mean / max over the retained history of one app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub mean_bytes_per_sec: f64,
    pub max_bytes_per_sec: f64,
    /// Number of speed intervals the statistics were computed from.
    pub intervals: usize,
}

/// Final summary row for one app seen during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub app_id: AppId,
    pub name: String,
    pub last: SpeedSample,
    pub stats: Option<SpeedStats>,
}

/// Human-readable fallback name when no manifest can be read.
pub fn fallback_name(app_id: AppId) -> String {
    format!("App {}", app_id)
}
