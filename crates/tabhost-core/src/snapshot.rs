use crate::ids::{TabId, WindowId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot keys that extra tab values may not override
pub const RESERVED_KEYS: &[&str] = &[
    "id",
    "windowId",
    "active",
    "incognito",
    "title",
    "url",
    "status",
    "audible",
    "discarded",
    "autoDiscardable",
    "highlighted",
    "index",
    "pinned",
    "selected",
    "placeholder",
];

/// Tab value reported to UI and extension code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    /// `-1` when the tab is not in a window
    pub window_id: i32,
    pub active: bool,
    pub incognito: bool,
    pub title: String,
    pub url: String,
    pub status: LoadStatus,
    pub audible: bool,
    pub discarded: bool,
    pub auto_discardable: bool,
    pub highlighted: bool,
    /// `-1` when the tab has no slot
    pub index: i64,
    pub pinned: bool,
    pub selected: bool,
    pub placeholder: bool,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
}

impl TabSnapshot {
    pub fn window(&self) -> Option<WindowId> {
        (self.window_id >= 0).then_some(WindowId(self.window_id))
    }

    pub fn slot(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}
