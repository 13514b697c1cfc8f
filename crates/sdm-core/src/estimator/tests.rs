//! Tests for the speed estimator and its history.

use std::time::{Duration, Instant};

use crate::config::EstimatorConfig;
use crate::record::{DownloadObservation, DownloadStatus};

use super::{History, SpeedEstimator};

const MIB: u64 = 1024 * 1024;

fn estimator() -> SpeedEstimator {
    SpeedEstimator::new(&EstimatorConfig::default())
}

fn at(t0: Instant, secs: f64) -> Instant {
    t0 + Duration::from_secs_f64(secs)
}

#[test]
fn first_observation_is_starting_at_zero() {
    let mut est = estimator();
    let t0 = Instant::now();
    let s = est.observe(7, t0, 500 * MIB);
    assert_eq!(s.status, DownloadStatus::Starting);
    assert_eq!(s.bytes_per_sec, 0.0);
}

#[test]
fn speed_is_size_delta_over_time_delta() {
    let mut est = estimator();
    let t0 = Instant::now();
    let sizes = [0, 4 * MIB, 10 * MIB, 10 * MIB + 512 * 1024, 30 * MIB];
    let times = [0.0, 2.0, 3.5, 5.0, 9.0];

    est.observe(1, at(t0, times[0]), sizes[0]);
    for i in 1..sizes.len() {
        let s = est.observe(1, at(t0, times[i]), sizes[i]);
        let expected = (sizes[i] - sizes[i - 1]) as f64 / (times[i] - times[i - 1]);
        assert_eq!(s.status, DownloadStatus::Downloading, "step {}", i);
        assert!(
            (s.bytes_per_sec - expected).abs() < 1e-3,
            "step {}: got {} expected {}",
            i,
            s.bytes_per_sec,
            expected
        );
    }
}

#[test]
fn equal_sizes_report_paused() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    est.observe(1, at(t0, 2.0), 20 * MIB);
    let s = est.observe(1, at(t0, 4.0), 20 * MIB);
    assert_eq!(s.status, DownloadStatus::Paused);
    assert_eq!(s.bytes_per_sec, 0.0);
}

#[test]
fn below_pause_floor_reports_paused() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 1000);
    // 5 KiB over one second is under the 10 KiB/s floor.
    let s = est.observe(1, at(t0, 1.0), 1000 + 5 * 1024);
    assert_eq!(s.status, DownloadStatus::Paused);
    assert_eq!(s.bytes_per_sec, 0.0);
}

#[test]
fn shrinking_folder_never_reports_negative_speed() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 50 * MIB);
    let s = est.observe(1, at(t0, 3.0), 10 * MIB);
    assert_eq!(s.status, DownloadStatus::Paused);
    assert_eq!(s.bytes_per_sec, 0.0);
}

#[test]
fn samples_under_min_gap_keep_previous_speed() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    let first = est.observe(1, at(t0, 2.0), 8 * MIB);
    assert_eq!(first.status, DownloadStatus::Downloading);

    let quick = est.observe(1, at(t0, 2.4), 100 * MIB);
    assert_eq!(quick, first);
    assert_eq!(est.last(1), Some(first));
}

#[test]
fn second_sample_under_min_gap_stays_starting() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    let s = est.observe(1, at(t0, 0.2), 40 * MIB);
    assert_eq!(s.status, DownloadStatus::Starting);
    assert_eq!(s.bytes_per_sec, 0.0);
}

#[test]
fn earlier_timestamp_is_treated_as_clock_anomaly() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, at(t0, 10.0), 10 * MIB);
    let grew = est.observe(1, at(t0, 5.0), 12 * MIB);
    assert_eq!(grew.status, DownloadStatus::Checking);
    assert_eq!(grew.bytes_per_sec, 0.0);

    let mut est = estimator();
    est.observe(2, at(t0, 10.0), 10 * MIB);
    let same = est.observe(2, at(t0, 5.0), 10 * MIB);
    assert_eq!(same.status, DownloadStatus::Paused);
}

#[test]
fn apps_are_tracked_independently() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    est.observe(2, t0, 0);
    let a = est.observe(1, at(t0, 1.0), 2 * MIB);
    let b = est.observe(2, at(t0, 1.0), 0);
    assert_eq!(a.status, DownloadStatus::Downloading);
    assert_eq!(b.status, DownloadStatus::Paused);
    assert_eq!(est.app_ids(), vec![1, 2]);
}

#[test]
fn mark_gone_keeps_history_for_stats() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(9, t0, 0);
    est.observe(9, at(t0, 2.0), 4 * MIB);
    let s = est.mark_gone(9, DownloadStatus::Idle);
    assert_eq!(s.status, DownloadStatus::Idle);
    assert_eq!(s.bytes_per_sec, 0.0);
    let stats = est.stats(9).expect("stats from retained history");
    assert_eq!(stats.intervals, 1);
    assert!((stats.max_bytes_per_sec - 2.0 * MIB as f64).abs() < 1e-3);
}

#[test]
fn mark_gone_for_unknown_app_has_no_stats() {
    let mut est = estimator();
    est.mark_gone(5, DownloadStatus::Completed);
    assert_eq!(est.last(5).map(|s| s.status), Some(DownloadStatus::Completed));
    assert!(est.stats(5).is_none());
}

#[test]
fn stats_are_mean_and_max_of_interval_speeds() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    est.observe(1, at(t0, 1.0), 2 * MIB);
    est.observe(1, at(t0, 2.0), 6 * MIB);
    est.observe(1, at(t0, 3.0), 6 * MIB);
    let stats = est.stats(1).unwrap();
    assert_eq!(stats.intervals, 3);
    assert!((stats.max_bytes_per_sec - 4.0 * MIB as f64).abs() < 1e-3);
    assert!((stats.mean_bytes_per_sec - 2.0 * MIB as f64).abs() < 1e-3);
}

#[test]
fn evicted_samples_no_longer_affect_stats() {
    let cfg = EstimatorConfig {
        max_samples: 4,
        ..EstimatorConfig::default()
    };
    let mut est = SpeedEstimator::new(&cfg);
    let t0 = Instant::now();
    // One huge burst, then steady 1 MiB/s.
    est.observe(1, t0, 0);
    est.observe(1, at(t0, 1.0), 500 * MIB);
    let mut size = 500 * MIB;
    for i in 2..8 {
        size += MIB;
        est.observe(1, at(t0, i as f64), size);
    }
    assert_eq!(est.history(1).unwrap().len(), 4);
    let stats = est.stats(1).unwrap();
    assert_eq!(stats.intervals, 3);
    assert!((stats.max_bytes_per_sec - MIB as f64).abs() < 1e-3);
    assert!((stats.mean_bytes_per_sec - MIB as f64).abs() < 1e-3);
}

#[test]
fn history_skips_backwards_pairs_and_clamps_shrinks() {
    let t0 = Instant::now();
    let mut h = History::new(10);
    h.push(DownloadObservation { timestamp: at(t0, 5.0), bytes: 10 });
    h.push(DownloadObservation { timestamp: at(t0, 1.0), bytes: 20 });
    h.push(DownloadObservation { timestamp: at(t0, 3.0), bytes: 0 });
    assert_eq!(h.interval_speeds(Duration::ZERO), vec![0.0]);
    assert!(History::new(10).stats(Duration::ZERO).is_none());
}

#[test]
fn pairs_under_min_gap_do_not_reach_stats() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(1, t0, 0);
    let live = est.observe(1, at(t0, 2.0), 20 * MIB);
    let quick = est.observe(1, at(t0, 2.01), 21 * MIB);
    assert_eq!(quick, live);

    let stats = est.stats(1).unwrap();
    assert_eq!(stats.intervals, 1);
    assert!((stats.max_bytes_per_sec - live.bytes_per_sec).abs() < 1e-3);
    assert!((stats.max_bytes_per_sec - 10.0 * MIB as f64).abs() < 1e-3);
}

#[test]
fn observation_after_mark_gone_starts_a_new_segment() {
    let mut est = estimator();
    let t0 = Instant::now();
    est.observe(3, t0, 0);
    est.observe(3, at(t0, 2.0), 4 * MIB);
    est.mark_gone(3, DownloadStatus::Idle);

    let back = est.observe(3, at(t0, 600.0), 600 * MIB);
    assert_eq!(back.status, DownloadStatus::Starting);
    assert_eq!(back.bytes_per_sec, 0.0);
    let stats = est.stats(3).unwrap();
    assert_eq!(stats.intervals, 1);
    assert!((stats.max_bytes_per_sec - 2.0 * MIB as f64).abs() < 1e-3);

    let next = est.observe(3, at(t0, 602.0), 610 * MIB);
    assert_eq!(next.status, DownloadStatus::Downloading);
    assert!((next.bytes_per_sec - 5.0 * MIB as f64).abs() < 1e-3);
    assert_eq!(est.stats(3).unwrap().intervals, 2);
}

#[test]
fn resumed_sample_blocks_only_the_gap_pair() {
    let t0 = Instant::now();
    let mut h = History::new(10);
    h.push(DownloadObservation { timestamp: t0, bytes: 0 });
    h.push_resumed(DownloadObservation { timestamp: at(t0, 100.0), bytes: 100 * MIB });
    assert!(h.last_two().is_none());
    h.push(DownloadObservation { timestamp: at(t0, 101.0), bytes: 101 * MIB });
    assert_eq!(h.interval_speeds(Duration::ZERO), vec![MIB as f64]);
}
