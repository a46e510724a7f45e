//! Installed software discovered through the uninstall registry branch.

use std::collections::HashSet;

use crate::domain::errors::ScanError;
use crate::domain::model::{EntryOrigin, SoftwareEntry};
use crate::infra::config::{RegistryView, Scan};
use crate::infra::registry::{RegistryAccess, UninstallRecord, read_uninstall_branch};

/// Entries returned when the registry cannot be used on this platform.
pub fn placeholder_entries() -> Vec<SoftwareEntry> {
    vec![
        SoftwareEntry::new(
            "Example Software 1",
            r"C:\Program Files\Example Software 1",
            EntryOrigin::Placeholder,
        ),
        SoftwareEntry::new(
            "Example Software 2",
            r"C:\Program Files\Example Software 2",
            EntryOrigin::Placeholder,
        ),
    ]
}

/// Scan the configured uninstall branches.
pub fn scan_installed(settings: &Scan) -> Result<Vec<SoftwareEntry>, ScanError> {
    scan_with(settings, read_uninstall_branch)
}

fn scan_with<F>(settings: &Scan, mut read: F) -> Result<Vec<SoftwareEntry>, ScanError>
where
    F: FnMut(RegistryView) -> Result<RegistryAccess, ScanError>,
{
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for view in settings.registry_views() {
        match read(view)? {
            RegistryAccess::Available(records) => {
                let before = entries.len();
                for entry in entries_from_records(records) {
                    let key = (entry.name.clone(), entry.location.clone());
                    if seen.insert(key) {
                        entries.push(entry);
                    }
                }
                tracing::info!(
                    branch = %view.display(),
                    count = entries.len() - before,
                    "installed software scanned"
                );
            }
            RegistryAccess::Unavailable => {
                if settings.placeholder_fallback() {
                    tracing::warn!("registry unavailable, using placeholder entries");
                    return Ok(placeholder_entries());
                }
                tracing::warn!("registry unavailable, installed software not listed");
                return Ok(Vec::new());
            }
        }
    }

    Ok(entries)
}

/// Keep records that carry both a display name and an install location.
pub fn entries_from_records(records: Vec<UninstallRecord>) -> Vec<SoftwareEntry> {
    records
        .into_iter()
        .filter_map(|record| {
            let name = record.display_name.filter(|value| !value.is_empty());
            let location = record.install_location.filter(|value| !value.is_empty());
            match (name, location) {
                (Some(name), Some(location)) => {
                    Some(SoftwareEntry::new(name, location, EntryOrigin::Registry))
                }
                _ => {
                    tracing::debug!(key = %record.key, "uninstall entry lacks name or location");
                    None
                }
            }
        })
        .collect()
}
