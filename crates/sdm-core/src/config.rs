use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;

/// Speed estimator parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Samples closer together than this keep the previous speed (seconds).
    pub min_sample_secs: f64,
    /// Throughput below this is reported as paused (bytes per second).
    pub pause_floor_bytes_per_sec: f64,
    /// Number of size samples kept per app for speed and statistics.
    pub max_samples: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_sample_secs: 1.0,
            pause_floor_bytes_per_sec: 10.0 * 1024.0,
            max_samples: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/sdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdmConfig {
    /// Seconds between two polls of the Steam directories.
    pub interval_secs: u64,
    /// Total run time of `sdm watch` in seconds.
    pub duration_secs: u64,
    /// Extra install roots tried before the built-in candidate list.
    #[serde(default)]
    pub library_hints: Vec<PathBuf>,
    /// Optional estimator tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub estimator: Option<EstimatorConfig>,
}

impl Default for SdmConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            duration_secs: 300,
            library_hints: Vec::new(),
            estimator: None,
        }
    }
}

impl EstimatorConfig {
    /// Polls `interval` apart must be far enough apart to produce a speed.
    pub fn check_interval(&self, interval: Duration) -> Result<()> {
        if self.min_sample_secs > interval.as_secs_f64() {
            anyhow::bail!(
                "estimator.min_sample_secs ({}) must not exceed the poll interval ({}s)",
                self.min_sample_secs,
                interval.as_secs()
            );
        }
        Ok(())
    }
}

impl SdmConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn estimator(&self) -> EstimatorConfig {
        self.estimator.clone().unwrap_or_default()
    }

    /// Reject values the poll loop or estimator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            anyhow::bail!("interval_secs must be at least 1");
        }
        if self.duration_secs == 0 {
            anyhow::bail!("duration_secs must be at least 1");
        }
        if let Some(est) = &self.estimator {
            if est.max_samples < 2 {
                anyhow::bail!("estimator.max_samples must be at least 2");
            }
            let thresholds = [est.min_sample_secs, est.pause_floor_bytes_per_sec];
            if thresholds.iter().any(|v| v.is_nan() || *v < 0.0) {
                anyhow::bail!("estimator thresholds must be non-negative");
            }
        }
        self.estimator().check_interval(self.interval())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(paths::config_dir()?.join("config.toml"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(&path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SdmConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
