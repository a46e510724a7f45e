//! Domain models for catalog entries and launch targets.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Extension of directly runnable files.
pub const EXECUTABLE_EXTENSION: &str = "exe";
/// Extension of desktop shortcut files.
pub const SHORTCUT_EXTENSION: &str = "lnk";

/// Where a catalog entry was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryOrigin {
    Shortcut,
    Registry,
    Placeholder,
}

impl EntryOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            EntryOrigin::Shortcut => "shortcut",
            EntryOrigin::Registry => "installed",
            EntryOrigin::Placeholder => "example",
        }
    }
}

/// A named program and the place it lives.
///
/// `location` is either an executable path (shortcut targets) or an install
/// directory (registry entries). It is not checked for existence at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftwareEntry {
    pub name: String,
    pub location: PathBuf,
    pub origin: EntryOrigin,
}

impl SoftwareEntry {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>, origin: EntryOrigin) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            origin,
        }
    }

    /// Case-insensitive substring match against the display name only.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        keyword.is_empty() || self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// One `cd` + `start` pair in a generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Launch {
    pub directory: PathBuf,
    pub executable: PathBuf,
}

impl Launch {
    /// Build a launch for `executable`, working from its containing directory.
    pub fn for_executable(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let directory = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            directory,
            executable,
        }
    }
}

/// Whether a file name or path string ends in the executable extension.
pub fn is_executable_name(name: &str) -> bool {
    has_extension(name, EXECUTABLE_EXTENSION)
}

/// Whether a file name or path string ends in the shortcut extension.
pub fn is_shortcut_name(name: &str) -> bool {
    has_extension(name, SHORTCUT_EXTENSION)
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.to_ascii_lowercase().ends_with(&format!(".{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_ignores_case_and_location() {
        let entry = SoftwareEntry::new("Foo Editor", "/opt/bar", EntryOrigin::Registry);
        assert!(entry.matches_keyword("foo"));
        assert!(entry.matches_keyword("EDITOR"));
        assert!(entry.matches_keyword(""));
        assert!(!entry.matches_keyword("bar"));
    }

    #[test]
    fn launch_uses_parent_directory() {
        let launch = Launch::for_executable("/apps/tool/bin/tool.exe");
        assert_eq!(launch.directory, PathBuf::from("/apps/tool/bin"));
    }

    #[test]
    fn extension_checks_are_case_insensitive() {
        assert!(is_executable_name(r"C:\Apps\Tool.EXE"));
        assert!(is_shortcut_name("Tool.lnk"));
        assert!(!is_executable_name("tool.exe.txt"));
        assert!(!is_executable_name("exe"));
    }
}
