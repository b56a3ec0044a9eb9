use serde::{Deserialize, Serialize};
use url::Url;

/// A committed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub url: Url,
    pub title: String,
}

/// Immutable snapshot of a surface's navigation history.
///
/// Copying history onto a placeholder is a plain value copy of this snapshot;
/// nothing here is shared with the surface it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHistory {
    entries: Vec<NavigationEntry>,
    current: Option<usize>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new snapshot with `entry` committed after the current entry.
    ///
    /// Forward entries past the current one are dropped, as a fresh navigation
    /// would do.
    pub fn with_entry(&self, entry: NavigationEntry) -> Self {
        let keep = self.current.map(|idx| idx + 1).unwrap_or(0);
        // A deserialized snapshot may point past its entries
        let mut entries = self.entries.get(..keep).unwrap_or(&self.entries).to_vec();
        entries.push(entry);
        let current = Some(entries.len() - 1);
        Self { entries, current }
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_entry(&self) -> Option<&NavigationEntry> {
        self.current.and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
