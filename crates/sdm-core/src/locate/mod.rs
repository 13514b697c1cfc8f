//! Steam install root discovery.
//!
//! Search order is: caller hints, the platform candidate list, then the
//! registry. The first existing directory wins. Nothing found is a
//! recoverable `LocateError::NotFound`; the CLI decides to exit on it.

mod candidates;
mod registry;

use std::path::{Path, PathBuf};

pub use candidates::default_candidates;
pub use registry::{default_registry, NoRegistry, RegistryLookup};
#[cfg(windows)]
pub use registry::WindowsRegistry;

#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("Steam installation not found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Candidate list plus registry used to find the install root.
pub struct Locator {
    candidates: Vec<PathBuf>,
    registry: Box<dyn RegistryLookup>,
}

impl Locator {
    pub fn new(candidates: Vec<PathBuf>, registry: Box<dyn RegistryLookup>) -> Self {
        Self {
            candidates,
            registry,
        }
    }

    /// Locator for the running platform.
    pub fn platform_default() -> Self {
        Self::new(default_candidates(), default_registry())
    }

    /// Return the first existing directory among `hints`, the candidates and the registry path.
    pub fn locate(&self, hints: &[PathBuf]) -> Result<PathBuf, LocateError> {
        let mut searched = Vec::new();
        for path in hints.iter().chain(self.candidates.iter()) {
            if is_existing_dir(path) {
                tracing::info!("Steam root found at {}", path.display());
                return Ok(path.clone());
            }
            searched.push(path.clone());
        }

        match self.registry.install_path() {
            Some(path) if is_existing_dir(&path) => {
                tracing::info!("Steam root found via registry at {}", path.display());
                return Ok(path);
            }
            Some(path) => {
                tracing::debug!("registry path {} does not exist", path.display());
                searched.push(path);
            }
            None => tracing::debug!("no registry entry for Steam"),
        }

        Err(LocateError::NotFound { searched })
    }
}

fn is_existing_dir(path: &Path) -> bool {
    path.is_dir()
}
