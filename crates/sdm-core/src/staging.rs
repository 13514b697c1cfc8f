//! The `steamapps/downloading` staging directory: one subfolder per active download.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::record::AppId;

/// An in-progress download found in some library's staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingItem {
    pub app_id: AppId,
    /// Library root that owns the staging directory.
    pub library: PathBuf,
    /// The item's staging folder.
    pub path: PathBuf,
}

pub fn staging_dir(library: &Path) -> PathBuf {
    library.join("steamapps").join("downloading")
}

/// Staging folders across all libraries, sorted by app id.
///
/// Missing staging directories and non-numeric folder names are skipped.
pub fn list_staging(libraries: &[PathBuf]) -> Vec<StagingItem> {
    let mut items = Vec::new();
    for library in libraries {
        let dir = staging_dir(library);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!("could not list {}: {}", dir.display(), e);
                continue;
            }
        };
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = entry.file_name();
            let Some(app_id) = name.to_str().and_then(|n| n.parse::<AppId>().ok()) else {
                tracing::debug!("ignoring staging folder {:?}", name);
                continue;
            };
            items.push(StagingItem {
                app_id,
                library: library.clone(),
                path: entry.path(),
            });
        }
    }
    items.sort_by_key(|i| i.app_id);
    items
}

/// Recursive size of all regular files under `path` (or the length of `path`
/// itself when it is a file).
///
/// Fails with the walk's error when `path` itself cannot be read, `NotFound`
/// when it is gone; entries that disappear during the walk are skipped.
pub fn directory_size(path: &Path) -> io::Result<u64> {
    let mut total = 0u64;
    let mut files = 0usize;
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::debug!("skipping entry under {}: {}", path.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(m) = entry.metadata() {
            total = total.saturating_add(m.len());
            files += 1;
        }
    }
    tracing::debug!(
        "{}: {} files, {:.2} MiB",
        path.display(),
        files,
        total as f64 / 1_048_576.0
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn list_staging_finds_numeric_folders_across_libraries() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        fs::create_dir_all(staging_dir(a.path()).join("570")).unwrap();
        fs::create_dir_all(staging_dir(a.path()).join("state_570_571")).unwrap();
        fs::write(staging_dir(a.path()).join("12"), b"file, not folder").unwrap();
        fs::create_dir_all(staging_dir(b.path()).join("440")).unwrap();
        let libs = vec![a.path().to_path_buf(), b.path().to_path_buf()];

        let items = list_staging(&libs);
        let ids: Vec<AppId> = items.iter().map(|i| i.app_id).collect();
        assert_eq!(ids, vec![440, 570]);
        assert_eq!(items[0].library, b.path());
        assert_eq!(items[1].path, staging_dir(a.path()).join("570"));
    }

    #[test]
    fn list_staging_without_staging_dir_is_empty() {
        let lib = tempdir().unwrap();
        assert!(list_staging(&[lib.path().to_path_buf()]).is_empty());
    }

    #[test]
    fn directory_size_sums_nested_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("depot/chunks");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 1000]).unwrap();
        fs::write(nested.join("b.bin"), vec![0u8; 24]).unwrap();
        let sparse = fs::File::create(nested.join("c.bin")).unwrap();
        sparse.set_len(3 * 1024 * 1024).unwrap();

        assert_eq!(directory_size(dir.path()).unwrap(), 1024 + 3 * 1024 * 1024);
    }

    #[test]
    fn directory_size_of_empty_folder_is_zero() {
        let dir = tempdir().unwrap();
        assert_eq!(directory_size(dir.path()).unwrap(), 0);
    }

    #[test]
    fn directory_size_of_missing_folder_is_not_found() {
        let dir = tempdir().unwrap();
        let err = directory_size(&dir.path().join("gone")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn directory_size_of_removed_folder_is_not_found() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("570");
        fs::create_dir_all(staged.join("depot")).unwrap();
        fs::write(staged.join("depot/a.bin"), vec![0u8; 64]).unwrap();
        assert_eq!(directory_size(&staged).unwrap(), 64);

        fs::remove_dir_all(&staged).unwrap();
        let err = directory_size(&staged).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn directory_size_of_a_file_is_its_length() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("chunk.bin");
        fs::write(&file, vec![0u8; 300]).unwrap();
        assert_eq!(directory_size(&file).unwrap(), 300);
    }
}
