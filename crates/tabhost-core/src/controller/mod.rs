//! Tab / content-surface lifecycle coordination.
//!
//! [`TabLifecycleController`] owns the tab records, the window registry and
//! the content host, and runs every state transition on one sequence. Windows,
//! the registry and the host report mutations through typed event streams;
//! the controller drains them in [`TabLifecycleController::dispatch_pending`]
//! after each operation, and runs posted tasks only from
//! [`TabLifecycleController::run_until_idle`].

mod attach;
mod close;
mod create;
mod pinned;
mod replace;

pub use close::{CloseDecision, WindowCloseOutcome};
pub use create::CreationOptions;

use crate::config::ControllerConfig;
use crate::events::{EventSink, EventStream, Notification, TabEvent, TabObservers};
use crate::host::{ContentHost, HostEvent};
use crate::ids::{SurfaceId, TabId, WindowId};
use crate::partition::Partition;
use crate::record::{TabRecord, TabRegistry};
use crate::snapshot::{LoadStatus, TabSnapshot};
use crate::tasks::{PostedTask, TaskQueue};
use crate::window::{RegistryEvent, StripEvent, WindowRegistry};
use crate::{Error, Result};
use std::collections::HashMap;
use tokio::sync::mpsc::unbounded_channel;

pub struct TabLifecycleController<H: ContentHost> {
    config: ControllerConfig,
    host: H,
    windows: WindowRegistry,
    tabs: TabRegistry,
    tasks: TaskQueue,
    observers: TabObservers,
    strip_sink: EventSink<StripEvent>,
    strip_events: EventStream<StripEvent>,
    registry_events: EventStream<RegistryEvent>,
    host_events: EventStream<HostEvent>,
    next_element_instance_id: u64,
    shutting_down: bool,
}

impl<H: ContentHost> TabLifecycleController<H> {
    pub fn new(mut host: H, config: ControllerConfig) -> Self {
        let (strip_sink, strip_events) = unbounded_channel();
        let (registry_sink, registry_events) = unbounded_channel();
        let (host_sink, host_events) = unbounded_channel();

        let mut windows = WindowRegistry::new();
        windows.subscribe(registry_sink);
        host.subscribe(host_sink);

        Self {
            config,
            host,
            windows,
            tabs: TabRegistry::new(),
            tasks: TaskQueue::new(),
            observers: TabObservers::default(),
            strip_sink,
            strip_events,
            registry_events,
            host_events,
            next_element_instance_id: 1,
            shutting_down: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access, for driving host-side behaviour (navigation and
    /// the like). Notifications it raises are handled on the next dispatch.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn record(&self, surface: SurfaceId) -> Option<&TabRecord> {
        self.tabs.get(surface)
    }

    /// Subscribe to lifecycle notifications
    pub fn subscribe(&mut self) -> EventStream<Notification> {
        self.observers.subscribe()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Mark the process as trying to quit; pinned tabs stop protecting their
    /// windows from closing.
    pub fn begin_shutdown(&mut self) {
        tracing::info!("Shutdown started");
        self.shutting_down = true;
    }

    // ---- windows ----------------------------------------------------------

    pub fn open_window(&mut self) -> WindowId {
        let id = self.windows.open();
        if let Some(window) = self.windows.get_mut(id) {
            window.subscribe(self.strip_sink.clone());
        }
        self.dispatch_pending();
        id
    }

    /// Make `id` the last-active window and reconcile pinned tabs against it
    pub fn activate_window(&mut self, id: WindowId) -> Result<()> {
        if !self.windows.set_last_active(id) {
            return Err(Error::WindowNotFound(id));
        }
        self.dispatch_pending();
        Ok(())
    }

    // ---- queries ----------------------------------------------------------

    pub fn is_pinned(&self, surface: SurfaceId) -> bool {
        self.tabs.get(surface).is_some_and(|r| r.pinned)
    }

    pub fn is_placeholder(&self, surface: SurfaceId) -> bool {
        self.tabs.get(surface).is_some_and(|r| r.is_placeholder)
    }

    pub fn is_active(&self, surface: SurfaceId) -> bool {
        self.window_of(surface)
            .and_then(|id| self.windows.get(id))
            .is_some_and(|window| window.active_surface() == Some(surface))
    }

    pub fn window_of(&self, surface: SurfaceId) -> Option<WindowId> {
        self.tabs.get(surface).and_then(|r| r.window_id)
    }

    pub fn slot_of(&self, surface: SurfaceId) -> Option<usize> {
        self.tabs.get(surface).and_then(|r| r.slot_index)
    }

    pub fn tab_id(&self, surface: SurfaceId) -> Option<TabId> {
        self.tabs.get(surface).map(|r| r.tab_id)
    }

    /// Look up a live surface by its session tab id
    pub fn tab_by_id(&self, tab_id: TabId) -> Option<SurfaceId> {
        self.tabs
            .surface_for(tab_id)
            .filter(|surface| self.host.is_alive(*surface))
    }

    /// Like [`Self::tab_by_id`], but only if the tab lives in `partition`
    pub fn tab_by_id_in(&self, tab_id: TabId, partition: &Partition) -> Option<SurfaceId> {
        let surface = self.tab_by_id(tab_id)?;
        let info = self.host.surface_info(surface)?;
        (info.partition == partition.with_prefix()).then_some(surface)
    }

    pub fn snapshot(&self, surface: SurfaceId) -> Option<TabSnapshot> {
        let record = self.tabs.get(surface)?;
        let info = self.host.surface_info(surface)?;
        let active = self.is_active(surface);

        Some(TabSnapshot {
            id: record.tab_id,
            window_id: record.window_id.map_or(-1, |w| w.0),
            active,
            incognito: info.off_the_record,
            title: info.title,
            url: info.url.map(|u| u.to_string()).unwrap_or_default(),
            status: if info.loading {
                LoadStatus::Loading
            } else {
                LoadStatus::Complete
            },
            audible: info.audible,
            discarded: self.host.is_discarded(surface),
            auto_discardable: info.auto_discardable,
            highlighted: active,
            index: record.slot_index.map_or(-1, |i| i as i64),
            pinned: record.pinned,
            selected: active,
            placeholder: record.is_placeholder,
            values: record.values.clone(),
        })
    }

    /// Merge extra tab values reported in snapshots.
    ///
    /// Keys that collide with snapshot fields are ignored.
    pub fn set_tab_values(
        &mut self,
        surface: SurfaceId,
        values: serde_json::Map<String, serde_json::Value>,
    ) -> bool {
        let Some(record) = self.tabs.get_mut(surface) else {
            return false;
        };
        for (key, value) in values {
            if crate::snapshot::RESERVED_KEYS.contains(&key.as_str()) {
                tracing::debug!("Ignoring reserved tab value key: {}", key);
                continue;
            }
            record.values.insert(key, value);
        }
        true
    }

    // ---- dispatch ---------------------------------------------------------

    /// Drain strip, registry and host notifications until all are empty
    pub fn dispatch_pending(&mut self) {
        loop {
            if let Ok(event) = self.strip_events.try_recv() {
                self.on_strip_event(event);
                continue;
            }
            if let Ok(event) = self.registry_events.try_recv() {
                self.on_registry_event(event);
                continue;
            }
            if let Ok(event) = self.host_events.try_recv() {
                self.on_host_event(event);
                continue;
            }
            break;
        }
    }

    /// Run only the tasks already posted; tasks they post in turn stay queued
    pub fn run_posted_tasks(&mut self) -> usize {
        self.dispatch_pending();
        let mut ran = 0;
        for _ in 0..self.tasks.len() {
            let Some(task) = self.tasks.next() else {
                break;
            };
            self.run_task(task);
            self.dispatch_pending();
            ran += 1;
        }
        ran
    }

    /// Dispatch notifications and run posted tasks until nothing is left.
    ///
    /// Returns the number of tasks run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        for _ in 0..self.config.max_dispatch_rounds {
            self.dispatch_pending();
            let Some(task) = self.tasks.next() else {
                return ran;
            };
            self.run_task(task);
            ran += 1;
        }
        self.dispatch_pending();
        tracing::warn!(
            "Stopped after {} dispatch rounds with {} tasks still pending",
            self.config.max_dispatch_rounds,
            self.tasks.len()
        );
        ran
    }

    fn run_task(&mut self, task: PostedTask) {
        tracing::debug!("Running task: {:?}", task);
        match task {
            PostedTask::DestroyPlaceholder(surface) => {
                // Reconciliation may have promoted it since the task was posted
                if self.is_placeholder(surface) {
                    self.destroy_tab(surface);
                } else {
                    tracing::debug!("{} is no longer a placeholder, keeping it", surface);
                }
            }
            PostedTask::ReapDetached(surface) => {
                let orphaned = self
                    .tabs
                    .get(surface)
                    .is_some_and(|r| r.synthetic && r.window_id.is_none());
                if orphaned {
                    self.destroy_tab(surface);
                }
            }
            PostedTask::CloseWindow(window) => {
                if self.windows.contains(window) {
                    match self.close_window(window) {
                        Ok(outcome) => tracing::debug!("Requested close of {}: {:?}", window, outcome),
                        Err(err) => tracing::warn!("Requested close of {} failed: {}", window, err),
                    }
                }
            }
        }
    }

    fn on_strip_event(&mut self, event: StripEvent) {
        tracing::trace!("strip event: {:?}", event);
        match event {
            StripEvent::Inserted {
                window,
                surface,
                slot,
            } => self.tab_inserted_at(window, surface, slot),
            StripEvent::Replaced {
                window,
                old,
                new,
                slot,
            } => self.tab_replaced_at(window, old, new, slot),
            StripEvent::Detached {
                window,
                surface,
                slot,
            } => self.tab_detached_at(window, surface, slot),
            StripEvent::PinnedStateChanged { surface, .. } => self.tab_pinned_state_changed(surface),
            StripEvent::ActiveChanged {
                window, surface, ..
            } => self.observers.emit(TabEvent::Activated { surface, window }),
        }
    }

    fn on_registry_event(&mut self, event: RegistryEvent) {
        tracing::trace!("registry event: {:?}", event);
        match event {
            RegistryEvent::Added(window) => tracing::debug!("Tracking {}", window),
            RegistryEvent::Removed(window) => self.on_window_removed(window),
            RegistryEvent::LastActiveChanged(window) => self.on_window_set_last_active(window),
        }
    }

    fn on_host_event(&mut self, event: HostEvent) {
        tracing::trace!("host event: {:?}", event);
        match event {
            HostEvent::DidAttach(surface) => self.did_attach(surface),
            HostEvent::Destroyed(surface) => self.surface_destroyed(surface),
            HostEvent::Cloned { source, clone } => self.did_clone_to_new_surface(source, clone),
        }
    }

    pub(crate) fn emit(&mut self, event: TabEvent) {
        self.observers.emit(event);
    }

    pub(crate) fn next_element_instance_id(&mut self) -> u64 {
        let id = self.next_element_instance_id;
        self.next_element_instance_id += 1;
        id
    }

    /// Re-read slot indices of every record bound to `window` from its strip
    pub(crate) fn resync_slots(&mut self, window: WindowId) {
        let Some(strip) = self.windows.get(window) else {
            return;
        };
        for surface in self.tabs.in_window(window) {
            let slot = strip.index_of(surface);
            if let Some(record) = self.tabs.get_mut(surface) {
                record.slot_index = slot;
            }
        }
    }

    // ---- invariants -------------------------------------------------------

    /// Verify that records and strips agree.
    ///
    /// Every strip occupant has a record bound to exactly that window slot,
    /// no surface occupies two slots, every record bound to a window is
    /// that window's occupant at its slot, and a logical tab has at most one
    /// placeholder record.
    pub fn check_invariants(&self) -> Result<()> {
        let mut occupied: HashMap<SurfaceId, (WindowId, usize)> = HashMap::new();

        for window in self.windows.all() {
            for (slot, surface) in window.surfaces().into_iter().enumerate() {
                if let Some((other_window, other_slot)) =
                    occupied.insert(surface, (window.id(), slot))
                {
                    return Err(Error::Invariant(format!(
                        "{} occupies {} slot {} and {} slot {}",
                        surface,
                        other_window,
                        other_slot,
                        window.id(),
                        slot
                    )));
                }
                let Some(record) = self.tabs.get(surface) else {
                    return Err(Error::Invariant(format!(
                        "{} in {} slot {} has no tab record",
                        surface,
                        window.id(),
                        slot
                    )));
                };
                if record.window_id != Some(window.id()) || record.slot_index != Some(slot) {
                    return Err(Error::Invariant(format!(
                        "{} occupies {} slot {} but its record says {:?} slot {:?}",
                        surface,
                        window.id(),
                        slot,
                        record.window_id,
                        record.slot_index
                    )));
                }
            }
        }

        for record in self.tabs.iter() {
            if let Some(window) = record.window_id {
                let occupies = occupied
                    .get(&record.surface_id)
                    .is_some_and(|(w, _)| *w == window);
                if !occupies {
                    return Err(Error::Invariant(format!(
                        "{} claims {} but is not in its strip",
                        record.surface_id, window
                    )));
                }
            }
        }

        let mut placeholders: HashMap<SurfaceId, SurfaceId> = HashMap::new();
        for record in self.tabs.iter().filter(|r| r.is_placeholder) {
            if let Some(other) = placeholders.insert(record.lineage, record.surface_id) {
                return Err(Error::Invariant(format!(
                    "{} and {} are both placeholders for the tab started by {}",
                    other, record.surface_id, record.lineage
                )));
            }
        }

        Ok(())
    }
}
