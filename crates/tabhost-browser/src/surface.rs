use tabhost_core::history::{NavigationEntry, NavigationHistory};
use tabhost_core::host::{AttachParams, SurfaceInfo};
use tabhost_core::ids::SurfaceId;
use url::Url;

const PERSISTENT_PREFIX: &str = "persist:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Real guest content
    Guest,
    /// Inert stand-in that never loads anything on its own
    Placeholder,
}

/// State the simulated host keeps for one content surface.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    kind: SurfaceKind,
    partition: String,
    parent_partition: Option<String>,
    history: NavigationHistory,
    pub(crate) visible: bool,
    pub(crate) loading: bool,
    pub(crate) audible: bool,
    pub(crate) load_count: u32,
    pub(crate) gesture_count: u32,
    pub(crate) foreground_eligible: bool,
    pub(crate) attached: bool,
    pub(crate) attach_params: Option<AttachParams>,
    pub(crate) discarded: bool,
    pub(crate) auto_discardable: bool,
    pub(crate) tab_id_changes: u32,
}

impl Surface {
    pub(crate) fn new(
        id: SurfaceId,
        kind: SurfaceKind,
        partition: String,
        parent_partition: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            partition,
            parent_partition,
            history: NavigationHistory::new(),
            visible: false,
            loading: false,
            audible: false,
            load_count: 0,
            gesture_count: 0,
            foreground_eligible: true,
            attached: false,
            attach_params: None,
            discarded: false,
            auto_discardable: true,
            tab_id_changes: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn parent_partition(&self) -> Option<&str> {
        self.parent_partition.as_deref()
    }

    /// Partitions without the persistent prefix live in memory only
    pub fn is_off_the_record(&self) -> bool {
        !self.partition.starts_with(PERSISTENT_PREFIX)
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub(crate) fn set_history(&mut self, history: NavigationHistory) {
        self.history = history;
    }

    pub(crate) fn commit(&mut self, url: Url, title: String) {
        self.history = self.history.with_entry(NavigationEntry { url, title });
        self.loading = false;
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.history.current_entry().map(|entry| &entry.url)
    }

    pub(crate) fn info(&self) -> SurfaceInfo {
        let current = self.history.current_entry();
        SurfaceInfo {
            url: current.map(|entry| entry.url.clone()),
            title: current.map(|entry| entry.title.clone()).unwrap_or_default(),
            loading: self.loading,
            audible: self.audible,
            off_the_record: self.is_off_the_record(),
            partition: self.partition.clone(),
            auto_discardable: self.auto_discardable,
        }
    }
}
