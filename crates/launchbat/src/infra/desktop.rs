//! Locating the current user's desktop directory.

use std::env;
use std::path::PathBuf;

/// The current user's desktop: `%USERPROFILE%\Desktop` when the profile variable is set,
/// otherwise the platform desktop directory.
pub fn desktop_dir() -> Option<PathBuf> {
    if let Some(profile) = env::var_os("USERPROFILE").filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(profile).join("Desktop"));
    }
    dirs_next::desktop_dir()
}
