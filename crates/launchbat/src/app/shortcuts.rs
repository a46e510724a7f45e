//! Desktop shortcut scanning.

use std::fs;
use std::path::Path;

use crate::domain::errors::ScanError;
use crate::domain::model::{EntryOrigin, SoftwareEntry, is_executable_name, is_shortcut_name};
use crate::infra::desktop::desktop_dir;
use crate::infra::shortcut::ShortcutResolver;

/// Scan the current user's desktop for shortcuts that point at executables.
pub fn scan_desktop(resolver: &dyn ShortcutResolver) -> Result<Vec<SoftwareEntry>, ScanError> {
    let desktop = desktop_dir().ok_or(ScanError::DesktopUnavailable)?;
    scan_directory(&desktop, resolver)
}

/// Scan `dir` (not recursively) for shortcut files whose target is an executable.
///
/// Entries keep directory listing order. The entry name is the shortcut file name without its
/// extension; the location is the resolved target.
pub fn scan_directory(
    dir: &Path,
    resolver: &dyn ShortcutResolver,
) -> Result<Vec<SoftwareEntry>, ScanError> {
    let listing = fs::read_dir(dir).map_err(|source| ScanError::DesktopUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for item in listing {
        let item = item.map_err(|source| ScanError::DesktopUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_name = item.file_name().to_string_lossy().into_owned();
        if !is_shortcut_name(&file_name) {
            continue;
        }

        let shortcut = item.path();
        let Some(target) = resolver.target(&shortcut) else {
            tracing::debug!(shortcut = %shortcut.display(), "shortcut has no target");
            continue;
        };
        if !is_executable_name(&target.to_string_lossy()) {
            tracing::debug!(
                shortcut = %shortcut.display(),
                target = %target.display(),
                "shortcut target is not an executable"
            );
            continue;
        }

        let name = strip_extension(&file_name);
        entries.push(SoftwareEntry::new(name, target, EntryOrigin::Shortcut));
    }

    tracing::info!(count = entries.len(), dir = %dir.display(), "desktop shortcuts scanned");
    Ok(entries)
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}
