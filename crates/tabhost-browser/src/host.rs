use crate::surface::{Surface, SurfaceKind};
use std::collections::BTreeMap;
use tabhost_core::error::HostError;
use tabhost_core::events::{EventSink, Subscribers};
use tabhost_core::history::NavigationHistory;
use tabhost_core::host::{AttachParams, ContentHost, GuestParams, HostEvent, SurfaceInfo};
use tabhost_core::ids::SurfaceId;
use url::Url;

/// In-memory content host.
///
/// Surfaces never render anything; the host only tracks the state the
/// lifecycle controller drives (visibility, loads, guest binding, history)
/// and reports attach, destroy and clone notifications.
#[derive(Debug)]
pub struct SimulatedHost {
    surfaces: BTreeMap<SurfaceId, Surface>,
    next_id: u64,
    observers: Subscribers<HostEvent>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            surfaces: BTreeMap::new(),
            next_id: 1,
            observers: Subscribers::default(),
        }
    }

    fn allocate(
        &mut self,
        kind: SurfaceKind,
        partition: String,
        parent_partition: Option<String>,
    ) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces
            .insert(id, Surface::new(id, kind, partition, parent_partition));
        id
    }

    pub fn surface(&self, surface: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&surface)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Commit a navigation on the surface, as if the page loaded `url`
    pub fn commit_navigation(&mut self, surface: SurfaceId, url: Url, title: &str) -> bool {
        let Some(state) = self.surfaces.get_mut(&surface) else {
            return false;
        };
        tracing::debug!("{} committed {}", surface, url);
        state.commit(url, title.to_string());
        true
    }

    pub fn set_audible(&mut self, surface: SurfaceId, audible: bool) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.audible = audible;
        }
    }

    /// Number of times a load has been started on the surface
    pub fn load_count(&self, surface: SurfaceId) -> u32 {
        self.surface(surface).map_or(0, |s| s.load_count)
    }

    pub fn gesture_count(&self, surface: SurfaceId) -> u32 {
        self.surface(surface).map_or(0, |s| s.gesture_count)
    }

    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.surface(surface).is_some_and(|s| s.visible)
    }

    pub fn is_foreground_eligible(&self, surface: SurfaceId) -> bool {
        self.surface(surface).is_some_and(|s| s.foreground_eligible)
    }

    pub fn is_placeholder_surface(&self, surface: SurfaceId) -> bool {
        self.surface(surface)
            .is_some_and(|s| s.kind() == SurfaceKind::Placeholder)
    }

    pub fn tab_id_changes(&self, surface: SurfaceId) -> u32 {
        self.surface(surface).map_or(0, |s| s.tab_id_changes)
    }
}

impl ContentHost for SimulatedHost {
    fn subscribe(&mut self, sink: EventSink<HostEvent>) {
        self.observers.add(sink);
    }

    fn create_guest_surface(
        &mut self,
        owner: Option<SurfaceId>,
        params: &GuestParams,
    ) -> Result<SurfaceId, HostError> {
        if let Some(owner) = owner.filter(|owner| !self.surfaces.contains_key(owner)) {
            return Err(HostError::InvalidOwner(owner));
        }
        if params.partition.is_empty() {
            return Err(HostError::InvalidParams("empty partition".to_string()));
        }

        let id = self.allocate(
            SurfaceKind::Guest,
            params.partition.clone(),
            params.parent_partition.clone(),
        );
        if let (Some(url), Some(state)) = (&params.url, self.surfaces.get_mut(&id)) {
            state.commit(url.clone(), String::new());
        }
        tracing::debug!("Allocated guest {} in {}", id, params.partition);
        Ok(id)
    }

    fn create_placeholder(&mut self, source: SurfaceId) -> Result<SurfaceId, HostError> {
        let state = self
            .surfaces
            .get(&source)
            .ok_or(HostError::SurfaceNotFound(source))?;
        let partition = state.partition().to_string();
        let parent = state.parent_partition().map(str::to_string);

        let id = self.allocate(SurfaceKind::Placeholder, partition, parent);
        tracing::debug!("Allocated placeholder {} for {}", id, source);
        Ok(id)
    }

    fn clone_surface(&mut self, source: SurfaceId) -> Result<SurfaceId, HostError> {
        let state = self
            .surfaces
            .get(&source)
            .ok_or(HostError::SurfaceNotFound(source))?;
        let partition = state.partition().to_string();
        let parent = state.parent_partition().map(str::to_string);
        let history = state.history().clone();

        let clone = self.allocate(SurfaceKind::Guest, partition, parent);
        if let Some(state) = self.surfaces.get_mut(&clone) {
            state.set_history(history);
        }
        self.observers.notify(HostEvent::Cloned { source, clone });
        Ok(clone)
    }

    fn destroy(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(&surface).is_some() {
            tracing::debug!("Destroyed {}", surface);
            self.observers.notify(HostEvent::Destroyed(surface));
        }
    }

    fn is_alive(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains_key(&surface)
    }

    fn show(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.visible = true;
        }
    }

    fn hide(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.visible = false;
        }
    }

    fn navigation_history(&self, surface: SurfaceId) -> NavigationHistory {
        self.surface(surface)
            .map(|s| s.history().clone())
            .unwrap_or_default()
    }

    fn copy_navigation_history_from(&mut self, target: SurfaceId, history: &NavigationHistory) {
        if let Some(state) = self.surfaces.get_mut(&target) {
            state.set_history(history.clone());
        }
    }

    fn begin_load(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.load_count += 1;
            state.loading = true;
            state.discarded = false;
        }
    }

    fn user_gesture_done(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.gesture_count += 1;
        }
    }

    fn set_foreground_eligible_while_detached(&mut self, surface: SurfaceId, eligible: bool) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.foreground_eligible = eligible;
        }
    }

    fn is_attached(&self, surface: SurfaceId) -> bool {
        self.surface(surface).is_some_and(|s| s.attached)
    }

    fn attach_params(&self, surface: SurfaceId) -> Option<AttachParams> {
        self.surface(surface).and_then(|s| s.attach_params)
    }

    fn set_attach_params(&mut self, surface: SurfaceId, params: AttachParams) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.attach_params = Some(params);
        }
    }

    fn attach_guest(&mut self, surface: SurfaceId) -> Result<(), HostError> {
        let state = self
            .surfaces
            .get_mut(&surface)
            .ok_or(HostError::SurfaceNotFound(surface))?;
        let params = state
            .attach_params
            .ok_or(HostError::MissingAttachParams(surface))?;
        state.attached = true;
        tracing::trace!(
            "{} attached to {} element {}",
            surface,
            params.owner_window,
            params.element_instance_id
        );
        self.observers.notify(HostEvent::DidAttach(surface));
        Ok(())
    }

    fn detach_guest(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.attached = false;
        }
    }

    fn tab_id_changed(&mut self, surface: SurfaceId) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.tab_id_changes += 1;
        }
    }

    fn is_discarded(&self, surface: SurfaceId) -> bool {
        self.surface(surface).is_some_and(|s| s.discarded)
    }

    fn discard(&mut self, surface: SurfaceId) -> bool {
        let Some(state) = self.surfaces.get_mut(&surface) else {
            return false;
        };
        if state.discarded {
            return false;
        }
        state.discarded = true;
        state.loading = false;
        state.visible = false;
        true
    }

    fn set_auto_discardable(&mut self, surface: SurfaceId, auto_discardable: bool) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.auto_discardable = auto_discardable;
        }
    }

    fn surface_info(&self, surface: SurfaceId) -> Option<SurfaceInfo> {
        self.surface(surface).map(Surface::info)
    }
}
