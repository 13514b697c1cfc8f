//! Console formatting helpers (binary units: 1 MB = 1024 * 1024 bytes).

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub const PROGRESS_BAR_WIDTH: usize = 20;

pub fn format_speed(bytes_per_sec: f64) -> String {
    let bps = if bytes_per_sec.is_finite() { bytes_per_sec.max(0.0) } else { 0.0 };
    if bps >= GIB {
        format!("{:.2} GB/s", bps / GIB)
    } else if bps >= 100.0 * MIB {
        format!("{:.1} MB/s", bps / MIB)
    } else if bps >= MIB {
        format!("{:.2} MB/s", bps / MIB)
    } else if bps >= KIB {
        format!("{:.1} KB/s", bps / KIB)
    } else {
        "0 B/s".to_string()
    }
}

pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.2} GiB", b / GIB)
    } else if b >= MIB {
        format!("{:.2} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.2} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

/// Decimal megabits per second, the unit Steam's own download page uses.
pub fn megabits_per_sec(bytes_per_sec: f64) -> f64 {
    bytes_per_sec.max(0.0) * 8.0 / 1_000_000.0
}

/// `[████░░░░]`-style bar; one full cell per `100 / width` percent.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let width = width.max(1);
    let per_cell = 100.0 / width as f64;
    let filled = if percent.is_finite() && percent > 0.0 {
        ((percent / per_cell) as usize).min(width)
    } else {
        0
    };
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
