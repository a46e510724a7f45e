//! The combined list of launchable software.

use anyhow::Result;

use crate::app::installed::scan_installed;
use crate::app::shortcuts::scan_desktop;
use crate::domain::model::SoftwareEntry;
use crate::infra::config::Scan;
use crate::infra::shortcut::ShortcutResolver;

/// Desktop shortcuts followed by installed software, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<SoftwareEntry>,
}

impl Catalog {
    /// Run both scanners once and concatenate their results.
    pub fn load(settings: &Scan, resolver: &dyn ShortcutResolver) -> Result<Self> {
        let mut entries = Vec::new();
        if settings.desktop() {
            entries.extend(scan_desktop(resolver)?);
        }
        if settings.registry() {
            entries.extend(scan_installed(settings)?);
        }
        tracing::info!(count = entries.len(), "catalog loaded");
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<SoftwareEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SoftwareEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SoftwareEntry> {
        self.entries.get(index)
    }

    /// Indices of entries whose display name contains `keyword`, ignoring case.
    pub fn filter_indices(&self, keyword: &str) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches_keyword(keyword))
            .map(|(index, _)| index)
            .collect()
    }

    /// Entries whose display name contains `keyword`, ignoring case.
    pub fn filter(&self, keyword: &str) -> Vec<&SoftwareEntry> {
        self.filter_indices(keyword)
            .into_iter()
            .filter_map(|index| self.entries.get(index))
            .collect()
    }

    /// Entries whose display name equals `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Vec<&SoftwareEntry> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase() == wanted)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::EntryOrigin;

    fn sample() -> Catalog {
        Catalog::from_entries(vec![
            SoftwareEntry::new("Foo Editor", "/p1", EntryOrigin::Registry),
            SoftwareEntry::new("Bar Tool", "/p2", EntryOrigin::Registry),
        ])
    }

    #[test]
    fn filter_matches_display_name_case_insensitively() {
        let catalog = sample();
        let filtered = catalog.filter("foo");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Foo Editor");
        assert_eq!(catalog.filter_indices("TOOL"), vec![1]);
    }

    #[test]
    fn filter_ignores_location() {
        assert!(sample().filter("p1").is_empty());
    }

    #[test]
    fn empty_keyword_keeps_everything() {
        assert_eq!(sample().filter_indices(""), vec![0, 1]);
    }

    #[test]
    fn find_by_name_requires_full_name() {
        let catalog = sample();
        assert_eq!(catalog.find_by_name("bar tool").len(), 1);
        assert!(catalog.find_by_name("bar").is_empty());
    }

    #[test]
    fn load_with_scanners_disabled_is_empty() -> Result<()> {
        struct NoShortcuts;
        impl ShortcutResolver for NoShortcuts {
            fn target(&self, _shortcut: &std::path::Path) -> Option<std::path::PathBuf> {
                None
            }
        }

        let mut settings = Scan::default();
        settings.set_desktop(false);
        settings.set_registry(false);
        let catalog = Catalog::load(&settings, &NoShortcuts)?;
        assert!(catalog.is_empty());
        Ok(())
    }
}
