//! CLI for the SDM Steam download monitor.

mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sdm_core::config;
use std::path::PathBuf;

use commands::{locate_root, run_locate, run_scan, run_watch, watch_timing};

/// Top-level CLI for the SDM download monitor.
#[derive(Debug, Parser)]
#[command(name = "sdm")]
#[command(about = "SDM: watch Steam download speed and progress from the console", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Poll the staging folders and print a report every interval.
    Watch {
        /// Seconds between polls (default from config, 60).
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
        /// Total run time in seconds (default from config, 300).
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        duration: Option<u64>,
        /// Steam install root to try before the built-in locations (repeatable).
        #[arg(long = "library", value_name = "PATH")]
        libraries: Vec<PathBuf>,
    },

    /// One-shot listing of libraries, staging folders and manifest progress.
    Scan {
        /// Steam install root to try before the built-in locations (repeatable).
        #[arg(long = "library", value_name = "PATH")]
        libraries: Vec<PathBuf>,
    },

    /// Print the located Steam root and every library folder.
    Locate {
        /// Steam install root to try before the built-in locations (repeatable).
        #[arg(long = "library", value_name = "PATH")]
        libraries: Vec<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Watch {
                interval,
                duration,
                libraries,
            } => {
                let (interval, duration) = watch_timing(&cfg, interval, duration)?;
                let root = locate_root(&cfg, &libraries)?;
                run_watch(&cfg, root, interval, duration).await?;
            }
            CliCommand::Scan { libraries } => {
                let root = locate_root(&cfg, &libraries)?;
                run_scan(&root)?;
            }
            CliCommand::Locate { libraries } => {
                let root = locate_root(&cfg, &libraries)?;
                run_locate(&root)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
