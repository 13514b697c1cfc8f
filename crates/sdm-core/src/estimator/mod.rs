//! Sampled-derivative speed estimator.
//!
//! Each poll feeds one `(timestamp, bytes)` observation per app. The speed is
//! the size delta between the two most recent samples divided by their time
//! delta, with three guards:
//! - samples closer than `min_sample_secs` keep the previous result
//! - shrinking or stalled folders (and anything under the pause floor) report
//!   `Paused` at 0 B/s
//! - a timestamp earlier than its predecessor reports 0 B/s instead of a
//!   negative speed
//!
//! History is bounded by sample count; the oldest samples are evicted first
//! and stop contributing to `stats`. An app observed again after `mark_gone`
//! starts over at `Starting`, and the gap is left out of `stats`.

mod history;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::EstimatorConfig;
use crate::record::{AppId, DownloadObservation, DownloadStatus, SpeedSample, SpeedStats};

pub use history::History;

#[derive(Debug)]
struct Tracked {
    history: History,
    last: SpeedSample,
    /// Set by `mark_gone`; the next observation opens a new segment.
    gone: bool,
}

/// Per-app observation histories owned by one monitor.
#[derive(Debug)]
pub struct SpeedEstimator {
    min_gap: Duration,
    pause_floor: f64,
    max_samples: usize,
    items: HashMap<AppId, Tracked>,
}

impl SpeedEstimator {
    pub fn new(cfg: &EstimatorConfig) -> Self {
        Self {
            min_gap: Duration::try_from_secs_f64(cfg.min_sample_secs).unwrap_or(Duration::ZERO),
            pause_floor: cfg.pause_floor_bytes_per_sec.max(0.0),
            max_samples: cfg.max_samples.max(2),
            items: HashMap::new(),
        }
    }

    /// Record a staging folder size and return the resulting speed sample.
    pub fn observe(&mut self, app_id: AppId, timestamp: Instant, bytes: u64) -> SpeedSample {
        let max_samples = self.max_samples;
        let tracked = self.items.entry(app_id).or_insert_with(|| Tracked {
            history: History::new(max_samples),
            last: SpeedSample::idle(DownloadStatus::Starting),
            gone: false,
        });
        let obs = DownloadObservation { timestamp, bytes };
        if tracked.gone {
            tracing::debug!(app_id, "staging folder back, starting a new segment");
            tracked.history.push_resumed(obs);
            tracked.gone = false;
        } else {
            tracked.history.push(obs);
        }

        let sample = match tracked.history.last_two() {
            None => SpeedSample::idle(DownloadStatus::Starting),
            Some((prev, cur)) => classify(prev, cur, tracked.last, self.min_gap, self.pause_floor),
        };
        tracked.last = sample;
        tracing::trace!(app_id, bytes, speed = sample.bytes_per_sec, status = %sample.status, "observe");
        sample
    }

    /// The staging folder is gone: report `status` at 0 B/s, keep the history for stats.
    pub fn mark_gone(&mut self, app_id: AppId, status: DownloadStatus) -> SpeedSample {
        let max_samples = self.max_samples;
        let sample = SpeedSample::idle(status);
        let tracked = self.items.entry(app_id).or_insert_with(|| Tracked {
            history: History::new(max_samples),
            last: sample,
            gone: true,
        });
        tracked.last = sample;
        tracked.gone = true;
        sample
    }

    pub fn last(&self, app_id: AppId) -> Option<SpeedSample> {
        self.items.get(&app_id).map(|t| t.last)
    }

    pub fn history(&self, app_id: AppId) -> Option<&History> {
        self.items.get(&app_id).map(|t| &t.history)
    }

    /// Mean / max over the retained history; `None` until two usable samples exist.
    /// Pairs closer than the minimum sample gap are ignored here as in `observe`.
    pub fn stats(&self, app_id: AppId) -> Option<SpeedStats> {
        self.items
            .get(&app_id)
            .and_then(|t| t.history.stats(self.min_gap))
    }

    /// Every app observed so far, ascending.
    pub fn app_ids(&self) -> Vec<AppId> {
        let mut ids: Vec<AppId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn classify(
    prev: DownloadObservation,
    cur: DownloadObservation,
    last: SpeedSample,
    min_gap: Duration,
    pause_floor: f64,
) -> SpeedSample {
    let Some(elapsed) = cur.timestamp.checked_duration_since(prev.timestamp) else {
        let status = if cur.bytes > prev.bytes {
            DownloadStatus::Checking
        } else {
            DownloadStatus::Paused
        };
        return SpeedSample::idle(status);
    };
    if elapsed < min_gap || elapsed.is_zero() {
        return last;
    }
    if cur.bytes <= prev.bytes {
        return SpeedSample::idle(DownloadStatus::Paused);
    }

    let bytes_per_sec = (cur.bytes - prev.bytes) as f64 / elapsed.as_secs_f64();
    if bytes_per_sec < pause_floor {
        return SpeedSample::idle(DownloadStatus::Paused);
    }
    SpeedSample {
        bytes_per_sec,
        status: DownloadStatus::Downloading,
    }
}

#[cfg(test)]
mod tests;
