//! `sdm watch` – poll until the duration elapses or Ctrl-C, then print a summary.

use anyhow::Result;
use sdm_core::config::SdmConfig;
use sdm_core::monitor::Monitor;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cli::report;

/// Ctrl-C listener. The handler is registered when this is created, so a
/// Ctrl-C during the first tick is still caught.
struct Interrupt {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
    #[cfg(windows)]
    signal: tokio::signal::windows::CtrlC,
}

impl Interrupt {
    fn install() -> io::Result<Self> {
        #[cfg(unix)]
        let signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let signal = tokio::signal::windows::ctrl_c()?;
        Ok(Self { signal })
    }

    /// Resolves on Ctrl-C; never resolves if the listener is missing or closed.
    async fn wait(this: &mut Option<Self>) {
        if let Some(interrupt) = this {
            if interrupt.signal.recv().await.is_some() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}

pub async fn run_watch(
    cfg: &SdmConfig,
    root: PathBuf,
    interval: Duration,
    duration: Duration,
) -> Result<()> {
    let mut interrupt = match Interrupt::install() {
        Ok(i) => Some(i),
        Err(e) => {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            None
        }
    };
    let mut monitor = Monitor::open(root, &cfg.estimator());
    print!(
        "{}",
        report::render_header(monitor.root(), monitor.libraries(), interval, duration)
    );
    tracing::info!(
        "watch started: interval {:?}, duration {:?}",
        interval,
        duration
    );

    let deadline = Instant::now() + duration;
    let mut tick = 0u64;

    let interrupted = loop {
        tick += 1;
        let records = monitor.poll(Instant::now());
        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        print!("{}", report::render_tick(tick, &clock, &records));

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break false;
        }
        let wait = interval.min(remaining);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = Interrupt::wait(&mut interrupt) => break true,
        }
    };

    if interrupted {
        tracing::info!("watch interrupted after {} poll(s)", tick);
    } else {
        tracing::info!("watch finished after {} poll(s)", tick);
    }
    print!("{}", report::render_summary(&monitor.summary(), interrupted));
    Ok(())
}
