use super::TabLifecycleController;
use crate::events::TabEvent;
use crate::host::{AttachParams, ContentHost};
use crate::ids::{SurfaceId, WindowId};
use crate::tasks::PostedTask;
use crate::{Error, Result};

impl<H: ContentHost> TabLifecycleController<H> {
    /// Put `surface` into `slot` of `window`, replacing the current occupant.
    ///
    /// Returns `false` without side effects if the tab, the window or the
    /// slot does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the surface's guest is already attached.
    pub fn attach_guest(&mut self, surface: SurfaceId, window: WindowId, slot: usize) -> bool {
        assert!(
            !self.host.is_attached(surface),
            "{} is already attached",
            surface
        );

        if !self.tabs.contains(surface) {
            tracing::debug!("Refusing to attach untracked {}", surface);
            return false;
        }
        let Some(strip) = self.windows.get_mut(window) else {
            tracing::debug!("Refusing to attach {}: {} not found", surface, window);
            return false;
        };
        if strip.replace_at(slot, surface).is_none() {
            tracing::debug!("Refusing to attach {}: {} has no slot {}", surface, window, slot);
            return false;
        }

        if let Some(record) = self.tabs.get_mut(surface) {
            record.window_id = Some(window);
            record.slot_index = Some(slot);
        }
        self.dispatch_pending();
        true
    }

    /// Swap `surface` out of its slot for a placeholder that continues its
    /// navigation history.
    ///
    /// Returns the retired surface, now in no window, or `None` if the tab was
    /// not attached.
    pub fn detach_guest(&mut self, surface: SurfaceId) -> Option<SurfaceId> {
        let record = self.tabs.get(surface)?;
        let window = record.window_id?;
        let slot = record.slot_index?;
        let (pinned, pending_close, lineage) =
            (record.pinned, record.pending_close, record.lineage);
        if !self.host.is_attached(surface) {
            return None;
        }

        let placeholder = match self.host.create_placeholder(surface) {
            Ok(placeholder) => placeholder,
            Err(err) => {
                tracing::warn!("Could not create a placeholder for {}: {}", surface, err);
                return None;
            }
        };
        let history = self.host.navigation_history(surface);
        self.host.copy_navigation_history_from(placeholder, &history);

        self.register_tab(placeholder);
        if let Some(record) = self.tabs.get_mut(placeholder) {
            record.slot_index = Some(slot);
            record.pinned = pinned;
            record.pending_close = pending_close;
            record.synthetic = true;
            record.lineage = lineage;
        }
        // The stand-in is now the tab's only placeholder
        if let Some(record) = self.tabs.get_mut(surface) {
            record.pending_close = false;
            record.is_placeholder = false;
        }
        self.set_placeholder(placeholder, true);

        if let Some(strip) = self.windows.get_mut(window) {
            strip.replace_at(slot, placeholder);
        }
        self.emit(TabEvent::Detached {
            surface,
            window,
            placeholder: Some(placeholder),
        });
        self.dispatch_pending();

        tracing::info!(
            "Detached {} from {} slot {}, {} stands in",
            surface,
            window,
            slot,
            placeholder
        );
        Some(surface)
    }

    /// Move a tab to another window's strip (appended in the background), or
    /// out of every window when `window` is `None`.
    pub fn set_window(&mut self, surface: SurfaceId, window: Option<WindowId>) -> Result<()> {
        let current = self
            .tabs
            .get(surface)
            .ok_or(Error::UnknownSurface(surface))?
            .window_id;
        if current == window {
            return Ok(());
        }
        if let Some(target) = window.filter(|id| !self.windows.contains(*id)) {
            return Err(Error::WindowNotFound(target));
        }

        if let Some(old) = current {
            let slot = self.windows.get(old).and_then(|w| w.index_of(surface));
            match (self.windows.get_mut(old), slot) {
                (Some(strip), Some(slot)) => {
                    strip.detach_at(slot);
                    self.dispatch_pending();
                }
                _ => {
                    // The strip is gone or no longer holds the surface
                    self.maybe_request_window_close(surface);
                    if let Some(record) = self.tabs.get_mut(surface) {
                        record.clear_window();
                    }
                }
            }
        }

        if let Some(target) = window {
            if let Some(strip) = self.windows.get_mut(target) {
                strip.append(surface, false);
            }
            self.dispatch_pending();
        }
        Ok(())
    }

    /// Select or deselect a tab in its window
    pub fn set_active(&mut self, surface: SurfaceId, active: bool) {
        if active {
            self.was_shown(surface);
        } else {
            self.host.hide(surface);
        }
        self.dispatch_pending();
    }

    fn was_shown(&mut self, surface: SurfaceId) {
        if let (Some(window), Some(slot)) = (self.window_of(surface), self.slot_of(surface)) {
            if let Some(strip) = self.windows.get_mut(window) {
                strip.activate_tab_at(slot);
            }
        }
        if !self.host.is_discarded(surface) {
            self.host.show(surface);
        }
        self.maybe_attach_or_create_pinned_tab(surface);
    }

    pub(super) fn did_attach(&mut self, surface: SurfaceId) {
        let Some(record) = self.tabs.get(surface) else {
            return;
        };
        let (window, slot, pinned, is_placeholder) = (
            record.window_id,
            record.slot_index,
            record.pinned,
            record.is_placeholder,
        );

        self.maybe_request_window_close(surface);
        if let (Some(window), Some(slot)) = (window, slot) {
            self.emit(TabEvent::Attached {
                surface,
                window,
                slot,
            });
        }

        if !is_placeholder {
            return;
        }
        self.host
            .set_foreground_eligible_while_detached(surface, false);
        if !pinned && !self.host.is_discarded(surface) {
            // Destroying now would pull the surface out from under the
            // notification that is still being delivered
            self.tasks.post(PostedTask::DestroyPlaceholder(surface));
        } else {
            self.maybe_attach_or_create_pinned_tab(surface);
        }
    }

    pub(super) fn tab_inserted_at(&mut self, window: WindowId, surface: SurfaceId, slot: usize) {
        tracing::debug!("{} inserted into {} at slot {}", surface, window, slot);
        self.register_tab(surface);
        let pinned = match self.tabs.get_mut(surface) {
            Some(record) => {
                record.window_id = Some(window);
                record.pinned
            }
            None => false,
        };
        self.resync_slots(window);
        if pinned {
            if let Some(strip) = self.windows.get_mut(window) {
                strip.set_tab_pinned(slot, true);
            }
        }

        if self.host.is_attached(surface) {
            self.host.tab_id_changed(surface);
            return;
        }
        let params = AttachParams {
            owner_window: window,
            element_instance_id: self.next_element_instance_id(),
        };
        self.host.set_attach_params(surface, params);
        self.host.tab_id_changed(surface);
        if let Err(err) = self.host.attach_guest(surface) {
            tracing::warn!("Could not attach {} to {}: {}", surface, window, err);
        }
    }

    pub(super) fn tab_detached_at(&mut self, window: WindowId, surface: SurfaceId, slot: usize) {
        tracing::debug!("{} detached from {} slot {}", surface, window, slot);
        self.maybe_request_window_close(surface);
        if let Some(record) = self
            .tabs
            .get_mut(surface)
            .filter(|r| r.window_id == Some(window))
        {
            record.clear_window();
        }
        if self.host.is_attached(surface) {
            self.host.detach_guest(surface);
        }
        self.resync_slots(window);
        self.emit(TabEvent::Detached {
            surface,
            window,
            placeholder: None,
        });
    }

    pub(super) fn on_window_removed(&mut self, window: WindowId) {
        tracing::info!("{} removed", window);
        for surface in self.tabs.surfaces() {
            self.maybe_request_window_close(surface);
            if let Some(record) = self
                .tabs
                .get_mut(surface)
                .filter(|r| r.window_id == Some(window))
            {
                record.clear_window();
            }
        }
        self.emit(TabEvent::WindowRemoved { window });
    }

    pub(super) fn on_window_set_last_active(&mut self, window: WindowId) {
        tracing::debug!("{} is now last active", window);
        self.emit(TabEvent::LastActiveChanged { window });
        for surface in self.tabs.surfaces() {
            self.maybe_request_window_close(surface);
            self.maybe_attach_or_create_pinned_tab(surface);
        }
    }
}
