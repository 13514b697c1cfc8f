//! Additional Steam library roots from `libraryfolders.vdf`.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

lazy_static! {
    // Modern `"path" "D:\\SteamLibrary"` and legacy `"1" "D:\\SteamLibrary"` entries.
    static ref LIBRARY_PATH: Regex = Regex::new(r#"(?m)^\s*"(?:path|\d+)"\s+"([^"]+)""#).unwrap();
}

/// Index locations relative to the install root, in lookup order.
const INDEX_FILES: [&str; 2] = ["steamapps/libraryfolders.vdf", "config/libraryfolders.vdf"];

/// Raw library paths listed in an index file, unescaped, in file order.
///
/// Numeric keys also appear in the per-library `"apps"` size table, so only
/// values containing a path separator are kept.
pub fn parse_library_folders(content: &str) -> Vec<PathBuf> {
    LIBRARY_PATH
        .captures_iter(content)
        .map(|c| c[1].replace("\\\\", "\\"))
        .filter(|v| v.contains('/') || v.contains('\\'))
        .map(PathBuf::from)
        .collect()
}

/// All library roots: `root` first, then every existing listed library, deduplicated.
pub fn library_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots = vec![root.to_path_buf()];

    let Some((index, content)) = read_index(root) else {
        return roots;
    };
    for path in parse_library_folders(&content) {
        if !path.is_dir() {
            tracing::debug!(
                "library {} from {} does not exist",
                path.display(),
                index.display()
            );
            continue;
        }
        if !roots.iter().any(|r| same_dir(r, &path)) {
            tracing::info!("additional library: {}", path.display());
            roots.push(path);
        }
    }
    roots
}

fn read_index(root: &Path) -> Option<(PathBuf, String)> {
    for rel in INDEX_FILES {
        let index = root.join(rel);
        match fs::read_to_string(&index) {
            Ok(content) => return Some((index, content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!("could not read {}: {}", index.display(), e);
                return None;
            }
        }
    }
    None
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
