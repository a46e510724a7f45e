//! Finding the executable that belongs to an installed program.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::model::is_executable_name;

/// Outcome of resolving an install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first executable whose file name contains the display name.
    Found(PathBuf),
    /// No name match; every executable found, in walk order. Empty means nothing was found.
    Candidates(Vec<PathBuf>),
}

/// Resolve `display_name` to an executable somewhere under `install_location`.
pub fn resolve(display_name: &str, install_location: &Path) -> Resolution {
    let candidates = collect_executables(install_location);
    match select_by_name(display_name, &candidates) {
        Some(found) => Resolution::Found(found.to_path_buf()),
        None => Resolution::Candidates(candidates),
    }
}

/// Every executable below `root`, walking top-down.
///
/// Within a directory, files come before subdirectories and otherwise keep listing order, so a
/// program's top-level executables precede those in nested folders. A `root` that is not a
/// directory yields nothing.
pub fn collect_executables(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "install location is not a directory");
        return Vec::new();
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_path(files_before_directories);

    let mut found = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "walk error");
                continue;
            }
        };
        // Links are not followed into directories, but a link to a file still counts.
        let is_file = entry.file_type().is_some_and(|kind| {
            kind.is_file() || (kind.is_symlink() && entry.path().is_file())
        });
        if is_file && is_executable_name(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = found.len(), "executables collected");
    found
}

/// First candidate whose file name contains `display_name`, ignoring case.
pub fn select_by_name<'a>(display_name: &str, candidates: &'a [PathBuf]) -> Option<&'a Path> {
    let needle = display_name.to_lowercase();
    candidates
        .iter()
        .find(|candidate| {
            candidate
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .map(PathBuf::as_path)
}

fn files_before_directories(a: &Path, b: &Path) -> Ordering {
    a.is_dir().cmp(&b.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use anyhow::Result;

    #[test]
    fn first_match_in_walk_order_wins() {
        let candidates = vec![
            PathBuf::from("/app/uninstall.exe"),
            PathBuf::from("/app/FooApp-helper.exe"),
            PathBuf::from("/app/bin/fooapp.exe"),
        ];
        assert_eq!(
            select_by_name("FOOAPP", &candidates),
            Some(Path::new("/app/FooApp-helper.exe"))
        );
    }

    #[test]
    fn match_uses_file_name_only() {
        let candidates = vec![PathBuf::from("/Foo/bin/run.exe")];
        assert_eq!(select_by_name("foo", &candidates), None);
    }

    #[test]
    fn resolves_nested_executable_by_name() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("bin"))?;
        fs::write(root.join("setup.exe"), b"")?;
        fs::write(root.join("readme.txt"), b"")?;
        fs::write(root.join("bin/FooEditor.exe"), b"")?;

        assert_eq!(
            resolve("fooeditor", root),
            Resolution::Found(root.join("bin/FooEditor.exe"))
        );
        Ok(())
    }

    #[test]
    fn returns_all_candidates_without_a_match() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("tools"))?;
        fs::write(root.join("launcher.exe"), b"")?;
        fs::write(root.join("tools/cli.EXE"), b"")?;
        fs::write(root.join("tools/notes.md"), b"")?;

        match resolve("Bar Suite", root) {
            Resolution::Candidates(candidates) => {
                assert_eq!(
                    candidates,
                    vec![root.join("launcher.exe"), root.join("tools/cli.EXE")]
                );
            }
            other => panic!("expected candidates, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn top_level_files_precede_nested_ones() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("a"))?;
        fs::write(root.join("a/inner.exe"), b"")?;
        fs::write(root.join("z.exe"), b"")?;

        let found = collect_executables(root);
        assert_eq!(found, vec![root.join("z.exe"), root.join("a/inner.exe")]);
        Ok(())
    }

    #[test]
    fn empty_tree_yields_empty_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join("docs"))?;
        fs::write(temp.path().join("docs/guide.pdf"), b"")?;
        assert_eq!(
            resolve("anything", temp.path()),
            Resolution::Candidates(Vec::new())
        );
        Ok(())
    }

    #[test]
    fn file_or_missing_location_yields_nothing() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("tool.exe");
        fs::write(&file, b"")?;
        assert!(collect_executables(&file).is_empty());
        assert!(collect_executables(&temp.path().join("missing")).is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_executables_are_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let real = temp.path().join("real");
        let install = temp.path().join("install");
        fs::create_dir_all(&real)?;
        fs::create_dir_all(&install)?;
        fs::write(real.join("tool.exe"), b"")?;
        std::os::unix::fs::symlink(real.join("tool.exe"), install.join("linked.exe"))?;
        std::os::unix::fs::symlink(real.join("missing.exe"), install.join("dangling.exe"))?;

        assert_eq!(collect_executables(&install), vec![install.join("linked.exe")]);
        Ok(())
    }
}
