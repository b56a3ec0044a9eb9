use crate::ids::{SurfaceId, TabId, WindowId};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Logical tab state for one content surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TabRecord {
    pub surface_id: SurfaceId,
    pub tab_id: TabId,
    /// Owning window; `None` when unattached
    pub window_id: Option<WindowId>,
    /// Position in the owning window's strip
    pub slot_index: Option<usize>,
    pub pinned: bool,
    pub is_placeholder: bool,
    /// A window close was requested but deferred while this tab was pinned
    pub pending_close: bool,
    /// Surface was manufactured by the controller as a stand-in
    pub synthetic: bool,
    /// First surface of the logical tab this record continues; stand-ins
    /// inherit it from the surface they replace
    pub lineage: SurfaceId,
    /// Extra values merged in by UI code and reported in snapshots
    pub values: Map<String, Value>,
}

impl TabRecord {
    pub fn new(surface_id: SurfaceId, tab_id: TabId) -> Self {
        Self {
            surface_id,
            tab_id,
            window_id: None,
            slot_index: None,
            pinned: false,
            is_placeholder: false,
            pending_close: false,
            synthetic: false,
            lineage: surface_id,
            values: Map::new(),
        }
    }

    pub fn is_attached_to_window(&self) -> bool {
        self.window_id.is_some()
    }

    pub(crate) fn clear_window(&mut self) {
        self.window_id = None;
        self.slot_index = None;
    }
}

/// Registry of tab records, keyed by surface and by session tab id.
///
/// Entries live exactly as long as their surface: the controller removes
/// them when the host reports the surface destroyed.
#[derive(Debug)]
pub struct TabRegistry {
    records: BTreeMap<SurfaceId, TabRecord>,
    by_tab_id: HashMap<TabId, SurfaceId>,
    next_tab_id: i32,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            by_tab_id: HashMap::new(),
            next_tab_id: 1,
        }
    }

    /// Create a fresh record (unattached, unpinned, not a placeholder).
    ///
    /// An existing record for `surface` is returned unchanged.
    pub fn register(&mut self, surface: SurfaceId) -> &mut TabRecord {
        let next_tab_id = &mut self.next_tab_id;
        let by_tab_id = &mut self.by_tab_id;
        self.records.entry(surface).or_insert_with(|| {
            let tab_id = TabId(*next_tab_id);
            *next_tab_id += 1;
            by_tab_id.insert(tab_id, surface);
            TabRecord::new(surface, tab_id)
        })
    }

    pub fn remove(&mut self, surface: SurfaceId) -> Option<TabRecord> {
        let record = self.records.remove(&surface)?;
        self.by_tab_id.remove(&record.tab_id);
        Some(record)
    }

    pub fn get(&self, surface: SurfaceId) -> Option<&TabRecord> {
        self.records.get(&surface)
    }

    pub fn get_mut(&mut self, surface: SurfaceId) -> Option<&mut TabRecord> {
        self.records.get_mut(&surface)
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.records.contains_key(&surface)
    }

    pub fn surface_for(&self, tab_id: TabId) -> Option<SurfaceId> {
        self.by_tab_id.get(&tab_id).copied()
    }

    /// Surfaces in ascending id order
    pub fn surfaces(&self) -> Vec<SurfaceId> {
        self.records.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabRecord> {
        self.records.values()
    }

    pub fn in_window(&self, window: WindowId) -> Vec<SurfaceId> {
        self.records
            .values()
            .filter(|r| r.window_id == Some(window))
            .map(|r| r.surface_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
