//! `sdm locate` – show the Steam root and library folders.

use anyhow::Result;
use sdm_core::library;
use sdm_core::staging;
use std::path::Path;

pub fn run_locate(root: &Path) -> Result<()> {
    println!("Steam root: {}", root.display());
    for lib in library::library_roots(root) {
        let marker = if staging::staging_dir(&lib).is_dir() {
            "staging dir present"
        } else {
            "no staging dir"
        };
        println!("  library {} ({})", lib.display(), marker);
    }
    Ok(())
}
