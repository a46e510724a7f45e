//! Reading the uninstall registry branch.

use crate::domain::errors::ScanError;
use crate::infra::config::RegistryView;

/// Raw values read from one uninstall subkey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallRecord {
    pub key: String,
    pub display_name: Option<String>,
    pub install_location: Option<String>,
}

/// Outcome of asking the platform for uninstall records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryAccess {
    Available(Vec<UninstallRecord>),
    /// The running platform has no registry API.
    Unavailable,
}

impl RegistryView {
    /// Subkey path of the uninstall branch for this view.
    pub fn subkey(&self) -> &'static str {
        match self {
            RegistryView::Hklm | RegistryView::Hkcu => {
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall"
            }
            RegistryView::HklmWow64 => {
                r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall"
            }
        }
    }

    pub fn hive_name(&self) -> &'static str {
        match self {
            RegistryView::Hklm | RegistryView::HklmWow64 => "HKEY_LOCAL_MACHINE",
            RegistryView::Hkcu => "HKEY_CURRENT_USER",
        }
    }

    pub fn display(&self) -> String {
        format!(r"{}\{}", self.hive_name(), self.subkey())
    }
}

/// Enumerate every subkey of the uninstall branch for `view`.
///
/// Failing to open the branch root is fatal, except for a branch that does not exist on this
/// machine (for example `WOW6432Node` on 32-bit Windows), which yields no records.
#[cfg(windows)]
pub fn read_uninstall_branch(view: RegistryView) -> Result<RegistryAccess, ScanError> {
    use std::io::ErrorKind;

    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

    let hive = match view {
        RegistryView::Hklm | RegistryView::HklmWow64 => RegKey::predef(HKEY_LOCAL_MACHINE),
        RegistryView::Hkcu => RegKey::predef(HKEY_CURRENT_USER),
    };

    let branch = match hive.open_subkey(view.subkey()) {
        Ok(branch) => branch,
        Err(err) if err.kind() == ErrorKind::NotFound && view != RegistryView::Hklm => {
            tracing::debug!(branch = %view.display(), "uninstall branch not present");
            return Ok(RegistryAccess::Available(Vec::new()));
        }
        Err(source) => {
            return Err(ScanError::RegistryUnreadable {
                path: view.display(),
                source,
            });
        }
    };

    let mut records = Vec::new();
    for name in branch.enum_keys() {
        let name = name.map_err(|source| ScanError::RegistryUnreadable {
            path: view.display(),
            source,
        })?;
        let subkey = match branch.open_subkey(&name) {
            Ok(subkey) => subkey,
            Err(err) => {
                tracing::debug!(key = %name, error = %err, "skipping unreadable uninstall subkey");
                continue;
            }
        };
        records.push(UninstallRecord {
            display_name: subkey.get_value::<String, _>("DisplayName").ok(),
            install_location: subkey.get_value::<String, _>("InstallLocation").ok(),
            key: name,
        });
    }

    Ok(RegistryAccess::Available(records))
}

#[cfg(not(windows))]
pub fn read_uninstall_branch(view: RegistryView) -> Result<RegistryAccess, ScanError> {
    tracing::debug!(branch = %view.display(), "registry API not available on this platform");
    Ok(RegistryAccess::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_map_to_uninstall_branches() {
        assert_eq!(
            RegistryView::Hklm.display(),
            r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall"
        );
        assert!(RegistryView::HklmWow64.subkey().contains("WOW6432Node"));
        assert_eq!(RegistryView::Hkcu.hive_name(), "HKEY_CURRENT_USER");
    }

    #[cfg(not(windows))]
    #[test]
    fn registry_is_unavailable_off_windows() {
        let access = read_uninstall_branch(RegistryView::Hklm).unwrap();
        assert_eq!(access, RegistryAccess::Unavailable);
    }
}
