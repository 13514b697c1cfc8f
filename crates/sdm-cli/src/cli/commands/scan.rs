//! `sdm scan` – one-shot view of what is staged right now.

use anyhow::Result;
use sdm_core::format::format_bytes;
use sdm_core::library;
use sdm_core::manifest;
use sdm_core::record::fallback_name;
use sdm_core::staging;
use std::path::Path;

pub fn run_scan(root: &Path) -> Result<()> {
    let libraries = library::library_roots(root);
    println!("Steam root: {} ({} libraries)", root.display(), libraries.len());

    let items = staging::list_staging(&libraries);
    if items.is_empty() {
        println!("No staging folders found.");
        return Ok(());
    }

    println!("{:<10} {:>12} {:>9}  {}", "APPID", "STAGED", "PROGRESS", "NAME");
    for item in items {
        let staged = match staging::directory_size(&item.path) {
            Ok(bytes) => format_bytes(bytes),
            Err(e) => {
                tracing::warn!("could not measure {}: {}", item.path.display(), e);
                "-".to_string()
            }
        };
        let manifest = match manifest::find_manifest(&libraries, &item.library, item.app_id) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };
        let progress = manifest
            .as_ref()
            .and_then(|m| m.progress())
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "-".to_string());
        let name = manifest
            .map(|m| m.name)
            .unwrap_or_else(|| fallback_name(item.app_id));
        println!("{:<10} {:>12} {:>9}  {}", item.app_id, staged, progress, name);
    }
    Ok(())
}
