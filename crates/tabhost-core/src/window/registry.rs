use super::Window;
use crate::events::{EventSink, Subscribers};
use crate::ids::WindowId;

/// Notification raised when the set of live windows changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    Added(WindowId),
    Removed(WindowId),
    LastActiveChanged(WindowId),
}

/// Process-wide set of live windows, in creation order, with last-active
/// tracking.
#[derive(Debug)]
pub struct WindowRegistry {
    windows: Vec<Window>,
    /// Activation history, most recently activated last
    activation_order: Vec<WindowId>,
    next_id: i32,
    observers: Subscribers<RegistryEvent>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            activation_order: Vec::new(),
            next_id: 1,
            observers: Subscribers::default(),
        }
    }

    pub fn subscribe(&mut self, sink: EventSink<RegistryEvent>) {
        self.observers.add(sink);
    }

    /// Create a new, empty window and return its id
    pub fn open(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.push(Window::new(id));
        tracing::debug!("Window registry: opened {}", id);
        self.observers.notify(RegistryEvent::Added(id));
        id
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    /// All live windows in creation order
    pub fn all(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn last_active(&self) -> Option<WindowId> {
        self.activation_order.last().copied()
    }

    /// Record `id` as the most recently activated window.
    ///
    /// Returns `false` if no such window exists.
    pub fn set_last_active(&mut self, id: WindowId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.activation_order.retain(|w| *w != id);
        self.activation_order.push(id);
        for window in &mut self.windows {
            if window.id() == id {
                window.activate();
            } else {
                window.deactivate();
            }
        }
        self.observers.notify(RegistryEvent::LastActiveChanged(id));
        true
    }

    /// Remove a window; the previously activated window becomes last-active
    /// and is announced as such.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let position = self.windows.iter().position(|w| w.id() == id)?;
        let window = self.windows.remove(position);
        let was_last_active = self.last_active() == Some(id);
        self.activation_order.retain(|w| *w != id);
        tracing::debug!("Window registry: removed {}", id);
        self.observers.notify(RegistryEvent::Removed(id));

        if was_last_active {
            if let Some(next) = self.last_active() {
                self.observers.notify(RegistryEvent::LastActiveChanged(next));
            }
        }
        Some(window)
    }
}
