use super::TabLifecycleController;
use crate::events::TabEvent;
use crate::host::ContentHost;
use crate::ids::SurfaceId;

impl<H: ContentHost> TabLifecycleController<H> {
    /// Pin or unpin a tab.
    ///
    /// A newly pinned tab becomes a placeholder awaiting reconciliation;
    /// unpinning clears the flag and never creates a placeholder.
    pub fn set_pinned(&mut self, surface: SurfaceId, pinned: bool) {
        let Some(record) = self.tabs.get_mut(surface) else {
            return;
        };
        if record.pinned == pinned {
            return;
        }
        record.pinned = pinned;
        let (window, slot) = (record.window_id, record.slot_index);
        self.emit(TabEvent::PinnedChanged { surface, pinned });

        if let (Some(window), Some(slot)) = (window, slot) {
            if let Some(strip) = self.windows.get_mut(window) {
                strip.set_tab_pinned(slot, pinned);
            }
        }
        // Strip observers run before the placeholder flag flips
        self.dispatch_pending();
        self.set_placeholder(surface, pinned);
    }

    pub(crate) fn set_placeholder(&mut self, surface: SurfaceId, placeholder: bool) {
        let Some(record) = self.tabs.get_mut(surface) else {
            return;
        };
        record.is_placeholder = placeholder;
        if !placeholder {
            self.host
                .set_foreground_eligible_while_detached(surface, true);
        }
    }

    /// Promote a pinned placeholder to real content if its window is the
    /// last-active one.
    ///
    /// Returns `true` if the tab was promoted. Safe to call speculatively:
    /// a tab that does not qualify is left untouched.
    pub fn maybe_attach_or_create_pinned_tab(&mut self, surface: SurfaceId) -> bool {
        let Some(record) = self.tabs.get(surface) else {
            return false;
        };
        if record.pending_close || !record.pinned || !record.is_placeholder {
            tracing::trace!("{} is not a pinned placeholder", surface);
            return false;
        }
        let Some(window) = record.window_id else {
            return false;
        };
        if !self.host.is_attached(surface) || self.windows.last_active() != Some(window) {
            tracing::trace!("{} stays a placeholder in {}", surface, window);
            return false;
        }

        self.set_placeholder(surface, false);
        self.host.user_gesture_done(surface);
        self.host.begin_load(surface);
        tracing::info!("Promoted pinned {} in {}", surface, window);
        self.emit(TabEvent::Promoted { surface, window });
        true
    }

    /// Run reconciliation for every tracked tab; returns how many were promoted
    pub fn reconcile(&mut self) -> usize {
        let promoted = self
            .tabs
            .surfaces()
            .into_iter()
            .filter(|surface| self.maybe_attach_or_create_pinned_tab(*surface))
            .count();
        self.dispatch_pending();
        promoted
    }

    pub(super) fn tab_pinned_state_changed(&mut self, surface: SurfaceId) {
        self.maybe_attach_or_create_pinned_tab(surface);
    }

    pub fn discard(&mut self, surface: SurfaceId) -> bool {
        let discarded = self.host.discard(surface);
        if discarded {
            tracing::debug!("Discarded {}", surface);
        }
        discarded
    }

    pub fn is_discarded(&self, surface: SurfaceId) -> bool {
        self.host.is_discarded(surface)
    }

    pub fn set_auto_discardable(&mut self, surface: SurfaceId, auto_discardable: bool) {
        self.host.set_auto_discardable(surface, auto_discardable);
    }
}
