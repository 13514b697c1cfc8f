//! Per-user directories for config and log files.
//!
//! Unix uses XDG base directories via the `xdg` crate; Windows uses
//! `%APPDATA%` for config and `%LOCALAPPDATA%` for state.

use anyhow::Result;
use std::path::PathBuf;

pub const APP_PREFIX: &str = "sdm";

/// Directory holding `config.toml`.
#[cfg(unix)]
pub fn config_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(xdg_dirs.get_config_home().join(APP_PREFIX))
}

/// Directory holding `sdm.log`.
#[cfg(unix)]
pub fn state_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(xdg_dirs.get_state_home().join(APP_PREFIX))
}

#[cfg(not(unix))]
pub fn config_dir() -> Result<PathBuf> {
    Ok(env_dir("APPDATA")?.join(APP_PREFIX))
}

#[cfg(not(unix))]
pub fn state_dir() -> Result<PathBuf> {
    Ok(env_dir("LOCALAPPDATA")?.join(APP_PREFIX))
}

#[cfg(not(unix))]
fn env_dir(var: &str) -> Result<PathBuf> {
    std::env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("{} is not set", var))
}

/// The current user's home directory, if the environment names one.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
