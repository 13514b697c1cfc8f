//! Best-effort registry lookup of the Steam install path.

use std::path::PathBuf;

/// Source of an install path outside the candidate list.
pub trait RegistryLookup {
    /// `None` when the platform has no registry or the key is absent.
    fn install_path(&self) -> Option<PathBuf>;
}

/// Lookup that never finds anything (non-Windows platforms, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRegistry;

impl RegistryLookup for NoRegistry {
    fn install_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Reads the Valve keys Steam writes on install.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl RegistryLookup for WindowsRegistry {
    fn install_path(&self) -> Option<PathBuf> {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
        use winreg::RegKey;

        let keys = [
            (HKEY_CURRENT_USER, r"Software\Valve\Steam", "SteamPath"),
            (HKEY_LOCAL_MACHINE, r"Software\Valve\Steam", "InstallPath"),
            (
                HKEY_LOCAL_MACHINE,
                r"Software\Wow6432Node\Valve\Steam",
                "InstallPath",
            ),
        ];
        for (hive, subkey, value) in keys {
            let path: Result<String, _> = RegKey::predef(hive)
                .open_subkey(subkey)
                .and_then(|key| key.get_value(value));
            match path {
                Ok(p) if !p.is_empty() => return Some(PathBuf::from(p)),
                Ok(_) => {}
                Err(e) => tracing::debug!("registry {}\\{}: {}", subkey, value, e),
            }
        }
        None
    }
}

#[cfg(windows)]
pub fn default_registry() -> Box<dyn RegistryLookup> {
    Box::new(WindowsRegistry)
}

#[cfg(not(windows))]
pub fn default_registry() -> Box<dyn RegistryLookup> {
    Box::new(NoRegistry)
}
