//! Well-known Steam install locations per platform.

use std::path::PathBuf;

use crate::paths;

#[cfg(windows)]
pub fn default_candidates() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = [
        "C:/Program Files (x86)/Steam",
        "C:/Program Files/Steam",
        "D:/Steam",
        "E:/Steam",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    if let Some(home) = paths::home_dir() {
        out.push(home.join("Steam"));
    }
    out
}

#[cfg(target_os = "macos")]
pub fn default_candidates() -> Vec<PathBuf> {
    let Some(home) = paths::home_dir() else {
        return Vec::new();
    };
    vec![
        home.join("Library/Application Support/Steam"),
        home.join("Steam"),
    ]
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn default_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    let home = paths::home_dir();
    if let Some(home) = &home {
        out.push(home.join(".steam/steam"));
    }
    match xdg::BaseDirectories::new() {
        Ok(dirs) => out.push(dirs.get_data_home().join("Steam")),
        Err(e) => tracing::debug!("xdg base dirs unavailable: {}", e),
    }
    if let Some(home) = &home {
        out.push(home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam"));
        out.push(home.join("Steam"));
    }
    dedup_keep_order(out)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn dedup_keep_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
