//! CLI command handlers. Each command is in its own file.

mod locate;
mod scan;
mod watch;

use anyhow::Result;
use sdm_core::config::SdmConfig;
use sdm_core::locate::Locator;
use std::path::PathBuf;
use std::time::Duration;

pub use locate::run_locate;
pub use scan::run_scan;
pub use watch::run_watch;

/// Find the Steam root: `--library` flags first, then config hints, then the platform defaults.
pub fn locate_root(cfg: &SdmConfig, cli_hints: &[PathBuf]) -> Result<PathBuf> {
    let hints: Vec<PathBuf> = cli_hints
        .iter()
        .chain(cfg.library_hints.iter())
        .cloned()
        .collect();
    Ok(Locator::platform_default().locate(&hints)?)
}

/// Interval and duration for `watch`: flags override the config, and the
/// estimator's minimum sample gap must still fit in the interval.
pub fn watch_timing(
    cfg: &SdmConfig,
    interval: Option<u64>,
    duration: Option<u64>,
) -> Result<(Duration, Duration)> {
    let interval = interval.map(Duration::from_secs).unwrap_or(cfg.interval());
    let duration = duration.map(Duration::from_secs).unwrap_or(cfg.duration());
    cfg.estimator().check_interval(interval)?;
    Ok((interval, duration))
}
