//! Bounded per-app sample history and its statistics.

use std::collections::VecDeque;
use std::time::Duration;

use crate::record::{DownloadObservation, SpeedStats};

/// Last `capacity` observations of one staging folder, oldest first.
///
/// A sample pushed with `push_resumed` starts a new segment: the pair that
/// ends on it spans a gap in observation and is never used for a speed.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    obs: DownloadObservation,
    resumed: bool,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, obs: DownloadObservation) {
        self.push_sample(Sample {
            obs,
            resumed: false,
        });
    }

    /// Push the first sample after the folder was gone.
    pub fn push_resumed(&mut self, obs: DownloadObservation) {
        self.push_sample(Sample { obs, resumed: true });
    }

    fn push_sample(&mut self, sample: Sample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DownloadObservation> {
        self.samples.iter().map(|s| &s.obs)
    }

    /// The two most recent samples of the current segment as `(previous, current)`.
    pub fn last_two(&self) -> Option<(DownloadObservation, DownloadObservation)> {
        let n = self.samples.len();
        if n < 2 || self.samples[n - 1].resumed {
            return None;
        }
        Some((self.samples[n - 2].obs, self.samples[n - 1].obs))
    }

    /// Speeds between consecutive samples of the same segment. Pairs closer
    /// than `min_gap` (or without forward time progress) are skipped;
    /// shrinking folders count as 0 B/s.
    pub fn interval_speeds(&self, min_gap: Duration) -> Vec<f64> {
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .filter(|(_, b)| !b.resumed)
            .filter_map(|(a, b)| {
                let elapsed = b.obs.timestamp.checked_duration_since(a.obs.timestamp)?;
                if elapsed.is_zero() || elapsed < min_gap {
                    return None;
                }
                Some(b.obs.bytes.saturating_sub(a.obs.bytes) as f64 / elapsed.as_secs_f64())
            })
            .collect()
    }

    pub fn stats(&self, min_gap: Duration) -> Option<SpeedStats> {
        let speeds = self.interval_speeds(min_gap);
        if speeds.is_empty() {
            return None;
        }
        let sum: f64 = speeds.iter().sum();
        let max = speeds.iter().copied().fold(0.0_f64, f64::max);
        Some(SpeedStats {
            mean_bytes_per_sec: sum / speeds.len() as f64,
            max_bytes_per_sec: max,
            intervals: speeds.len(),
        })
    }
}
