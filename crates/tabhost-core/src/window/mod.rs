mod registry;

pub use registry::{RegistryEvent, WindowRegistry};

use crate::events::{EventSink, Subscribers};
use crate::ids::{SurfaceId, WindowId};

/// Notification raised by a window's tab strip after it has been mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripEvent {
    Inserted {
        window: WindowId,
        surface: SurfaceId,
        slot: usize,
    },
    Replaced {
        window: WindowId,
        old: SurfaceId,
        new: SurfaceId,
        slot: usize,
    },
    Detached {
        window: WindowId,
        surface: SurfaceId,
        slot: usize,
    },
    PinnedStateChanged {
        window: WindowId,
        surface: SurfaceId,
        slot: usize,
    },
    ActiveChanged {
        window: WindowId,
        surface: SurfaceId,
        slot: usize,
    },
}

/// One position in a tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub surface: SurfaceId,
    pub pinned: bool,
}

/// A browser window: an ordered strip of slots plus its own visibility and
/// activation state.
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    slots: Vec<Slot>,
    active_slot: Option<usize>,
    visible: bool,
    activated: bool,
    observers: Subscribers<StripEvent>,
}

impl Window {
    pub(crate) fn new(id: WindowId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            active_slot: None,
            visible: true,
            activated: false,
            observers: Subscribers::default(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Register a sink for this window's strip notifications
    pub fn subscribe(&mut self, sink: EventSink<StripEvent>) {
        self.observers.add(sink);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn surfaces(&self) -> Vec<SurfaceId> {
        self.slots.iter().map(|slot| slot.surface).collect()
    }

    pub fn surface_at(&self, slot: usize) -> Option<SurfaceId> {
        self.slots.get(slot).map(|s| s.surface)
    }

    pub fn index_of(&self, surface: SurfaceId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.surface == surface)
    }

    pub fn is_pinned_at(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.pinned)
    }

    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.active_slot.and_then(|slot| self.surface_at(slot))
    }

    /// Append `surface` to the end of the strip, selecting it when `foreground`
    pub fn append(&mut self, surface: SurfaceId, foreground: bool) -> usize {
        let slot = self.slots.len();
        self.insert_at(slot, surface, foreground)
    }

    /// Insert `surface` at `slot` (clamped to the strip length)
    pub fn insert_at(&mut self, slot: usize, surface: SurfaceId, foreground: bool) -> usize {
        let slot = slot.min(self.slots.len());
        self.slots.insert(
            slot,
            Slot {
                surface,
                pinned: false,
            },
        );
        if let Some(active) = self.active_slot.filter(|active| *active >= slot) {
            self.active_slot = Some(active + 1);
        }
        self.observers.notify(StripEvent::Inserted {
            window: self.id,
            surface,
            slot,
        });
        if foreground {
            self.activate_tab_at(slot);
        }
        slot
    }

    /// Swap the occupant of `slot` for `surface`, keeping the slot's pin state.
    ///
    /// Returns the previous occupant, or `None` if `slot` is out of range.
    pub fn replace_at(&mut self, slot: usize, surface: SurfaceId) -> Option<SurfaceId> {
        let entry = self.slots.get_mut(slot)?;
        let old = std::mem::replace(&mut entry.surface, surface);
        self.observers.notify(StripEvent::Replaced {
            window: self.id,
            old,
            new: surface,
            slot,
        });
        Some(old)
    }

    /// Remove the slot at `slot`, shifting later slots down
    pub fn detach_at(&mut self, slot: usize) -> Option<SurfaceId> {
        if slot >= self.slots.len() {
            return None;
        }
        let removed = self.slots.remove(slot);
        self.active_slot = match self.active_slot {
            Some(active) if active == slot => {
                if self.slots.is_empty() {
                    None
                } else {
                    Some(slot.min(self.slots.len() - 1))
                }
            }
            Some(active) if active > slot => Some(active - 1),
            other => other,
        };
        self.observers.notify(StripEvent::Detached {
            window: self.id,
            surface: removed.surface,
            slot,
        });
        Some(removed.surface)
    }

    pub fn set_tab_pinned(&mut self, slot: usize, pinned: bool) -> bool {
        let Some(entry) = self.slots.get_mut(slot) else {
            return false;
        };
        if entry.pinned == pinned {
            return true;
        }
        entry.pinned = pinned;
        let surface = entry.surface;
        self.observers.notify(StripEvent::PinnedStateChanged {
            window: self.id,
            surface,
            slot,
        });
        true
    }

    pub fn activate_tab_at(&mut self, slot: usize) -> bool {
        let Some(surface) = self.surface_at(slot) else {
            return false;
        };
        if self.active_slot == Some(slot) {
            return true;
        }
        self.active_slot = Some(slot);
        self.observers.notify(StripEvent::ActiveChanged {
            window: self.id,
            surface,
            slot,
        });
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn activate(&mut self) {
        self.visible = true;
        self.activated = true;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
    }
}
