//! Typed event subscriptions.
//!
//! Windows, the window registry and the content host each keep a list of
//! sinks and push their notifications into them. Whoever holds the receiving
//! end drains it on its own sequence, so a notification never re-enters the
//! object that raised it.

use crate::ids::{SurfaceId, WindowId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

pub type EventSink<T> = UnboundedSender<T>;
pub type EventStream<T> = UnboundedReceiver<T>;

/// Fan-out list of sinks for one event type.
#[derive(Debug)]
pub struct Subscribers<T> {
    sinks: Vec<EventSink<T>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self { sinks: Vec::new() }
    }
}

impl<T: Clone> Subscribers<T> {
    pub fn add(&mut self, sink: EventSink<T>) {
        self.sinks.push(sink);
    }

    /// Deliver `event` to every live sink, dropping sinks whose receiver is gone
    pub fn notify(&mut self, event: T) {
        self.sinks.retain(|sink| sink.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

/// Lifecycle notifications exposed to UI and extension code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabEvent {
    Created {
        surface: SurfaceId,
    },
    Attached {
        surface: SurfaceId,
        window: WindowId,
        slot: usize,
    },
    Detached {
        surface: SurfaceId,
        window: WindowId,
        placeholder: Option<SurfaceId>,
    },
    Replaced {
        window: WindowId,
        slot: usize,
        old: SurfaceId,
        new: SurfaceId,
    },
    PinnedChanged {
        surface: SurfaceId,
        pinned: bool,
    },
    Promoted {
        surface: SurfaceId,
        window: WindowId,
    },
    Activated {
        surface: SurfaceId,
        window: WindowId,
    },
    Destroyed {
        surface: SurfaceId,
    },
    WindowHidden {
        window: WindowId,
    },
    WindowRemoved {
        window: WindowId,
    },
    LastActiveChanged {
        window: WindowId,
    },
    CloseRequested {
        window: WindowId,
    },
}

/// A [`TabEvent`] stamped with the time it was raised.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: TabEvent,
}

/// Observer bus for [`TabEvent`]s.
#[derive(Debug, Default)]
pub struct TabObservers {
    subscribers: Subscribers<Notification>,
}

impl TabObservers {
    pub fn subscribe(&mut self) -> EventStream<Notification> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.add(tx);
        rx
    }

    pub fn emit(&mut self, event: TabEvent) {
        tracing::trace!("tab event: {:?}", event);
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.notify(Notification {
            at: Utc::now(),
            event,
        });
    }
}
