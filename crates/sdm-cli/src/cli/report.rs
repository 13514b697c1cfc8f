//! Console rendering for `sdm watch`. Everything returns a `String` so the
//! layout can be tested without capturing stdout.

use sdm_core::format::{
    format_bytes, format_speed, megabits_per_sec, progress_bar, PROGRESS_BAR_WIDTH,
};
use sdm_core::record::{DownloadRecord, DownloadStatus, ItemSummary};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const RULE_WIDTH: usize = 70;

fn rule(c: char) -> String {
    std::iter::repeat(c).take(RULE_WIDTH).collect()
}

fn status_icon(status: DownloadStatus) -> &'static str {
    match status {
        DownloadStatus::Downloading => "⬇",
        DownloadStatus::Paused => "⏸",
        DownloadStatus::Starting => "…",
        DownloadStatus::Checking => "?",
        DownloadStatus::Idle => "·",
        DownloadStatus::Completed => "✔",
    }
}

pub fn render_header(
    root: &Path,
    libraries: &[PathBuf],
    interval: Duration,
    duration: Duration,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule('='));
    let _ = writeln!(out, "Steam download monitor");
    let _ = writeln!(out, "Steam root: {}", root.display());
    for lib in libraries {
        let _ = writeln!(out, "  library: {}", lib.display());
    }
    let _ = writeln!(
        out,
        "Polling every {}s for {}s (Ctrl-C to stop early)",
        interval.as_secs(),
        duration.as_secs()
    );
    let _ = writeln!(out, "{}", rule('='));
    out
}

pub fn render_record(record: &DownloadRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", status_icon(record.status), record.name);
    let _ = writeln!(out, "   AppID:  {}", record.app_id);
    let _ = writeln!(out, "   Status: {}", record.status);
    let _ = writeln!(
        out,
        "   Speed:  {} ({:.1} Mbit/s)",
        format_speed(record.bytes_per_sec),
        megabits_per_sec(record.bytes_per_sec)
    );
    if let Some(reported) = record.reported_bytes_per_sec {
        let _ = writeln!(out, "   Steam reports: {}", format_speed(reported));
    }
    if let Some(pct) = record.progress {
        let _ = write!(
            out,
            "   Progress: {} {:.1}%",
            progress_bar(pct, PROGRESS_BAR_WIDTH),
            pct
        );
        if let (Some(done), Some(total)) = (record.bytes_downloaded, record.bytes_total) {
            let _ = write!(out, " ({} / {})", format_bytes(done), format_bytes(total));
        }
        out.push('\n');
    }
    let _ = writeln!(out, "   Library: {}", record.library.display());
    out
}

/// One poll's block: a numbered header with the wall-clock time, then every record.
pub fn render_tick(tick: u64, clock: &str, records: &[DownloadRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nUpdate #{} - {}", tick, clock);
    let _ = writeln!(out, "{}", rule('-'));
    if records.is_empty() {
        let _ = writeln!(out, "No active downloads");
    }
    for record in records {
        out.push_str(&render_record(record));
    }
    out
}

pub fn render_summary(items: &[ItemSummary], interrupted: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule('='));
    if interrupted {
        let _ = writeln!(out, "Monitoring interrupted");
    } else {
        let _ = writeln!(out, "Monitoring finished");
    }
    let _ = writeln!(out, "{}", rule('='));
    if items.is_empty() {
        let _ = writeln!(out, "No downloads observed");
        return out;
    }
    for item in items {
        let _ = writeln!(
            out,
            "{} {} (AppID {})",
            status_icon(item.last.status),
            item.name,
            item.app_id
        );
        let _ = writeln!(
            out,
            "   Last:   {} at {}",
            item.last.status,
            format_speed(item.last.bytes_per_sec)
        );
        match item.stats {
            Some(stats) => {
                let _ = writeln!(
                    out,
                    "   Mean:   {}  Max: {}  ({} intervals)",
                    format_speed(stats.mean_bytes_per_sec),
                    format_speed(stats.max_bytes_per_sec),
                    stats.intervals
                );
            }
            None => {
                let _ = writeln!(out, "   Not enough samples for statistics");
            }
        }
    }
    out
}
