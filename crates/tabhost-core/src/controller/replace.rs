use super::TabLifecycleController;
use crate::events::TabEvent;
use crate::host::{AttachParams, ContentHost};
use crate::ids::{SurfaceId, WindowId};
use crate::tasks::PostedTask;
use crate::{Error, Result};

impl<H: ContentHost> TabLifecycleController<H> {
    /// Drop `surface` into `slot` of `window`, taking it out of any strip it
    /// is in first. This is what a drag-and-drop reparent does.
    ///
    /// Returns the surface that previously occupied the slot.
    pub fn replace_in_strip(
        &mut self,
        window: WindowId,
        slot: usize,
        surface: SurfaceId,
    ) -> Result<Option<SurfaceId>> {
        if !self.windows.contains(window) {
            return Err(Error::WindowNotFound(window));
        }
        if !self.tabs.contains(surface) {
            return Err(Error::UnknownSurface(surface));
        }

        let from = self.window_of(surface);
        let from_slot = self.slot_of(surface);
        let mut len = self.windows.get(window).map_or(0, |strip| strip.len());
        let mut slot = slot;
        if from == Some(window) {
            if from_slot == Some(slot) {
                return Ok(None);
            }
            len -= 1;
            if from_slot.is_some_and(|s| s < slot) {
                slot -= 1;
            }
        }
        if slot >= len {
            return Err(Error::SlotOutOfRange { window, slot });
        }

        if from.is_some() {
            self.set_window(surface, None)?;
        }
        let old = self
            .windows
            .get_mut(window)
            .and_then(|strip| strip.replace_at(slot, surface));
        self.dispatch_pending();
        Ok(old)
    }

    pub(super) fn tab_replaced_at(
        &mut self,
        window: WindowId,
        old: SurfaceId,
        new: SurfaceId,
        slot: usize,
    ) {
        if old == new {
            return;
        }
        let Some(old_record) = self.tabs.get(old) else {
            self.tab_inserted_at(window, new, slot);
            return;
        };
        let (pinned, synthetic) = (old_record.pinned, old_record.synthetic);
        tracing::debug!("{} replaces {} in {} slot {}", new, old, window, slot);

        let carried = self.host.attach_params(old);
        self.register_tab(new);
        if let Some(record) = self.tabs.get_mut(new) {
            record.slot_index = Some(slot);
            record.pinned = pinned;
        }

        self.maybe_request_window_close(old);
        if let Some(record) = self.tabs.get_mut(old) {
            record.clear_window();
        }
        if let Some(record) = self.tabs.get_mut(new) {
            record.window_id = Some(window);
        }
        self.host.hide(old);

        // Bookkeeping is settled; only now swap the guest bindings
        let params = match carried {
            Some(params) => params,
            None => AttachParams {
                owner_window: window,
                element_instance_id: self.next_element_instance_id(),
            },
        };
        self.host.set_attach_params(new, params);
        self.host.tab_id_changed(new);
        if self.host.is_attached(old) {
            self.host.detach_guest(old);
        }
        if !self.host.is_attached(new) {
            if let Err(err) = self.host.attach_guest(new) {
                tracing::warn!("Could not attach {} to {}: {}", new, window, err);
            }
        }

        self.emit(TabEvent::Replaced {
            window,
            slot,
            old,
            new,
        });

        if synthetic && self.config.reap_orphaned_placeholders {
            self.tasks.post(PostedTask::ReapDetached(old));
        }
    }
}
