use super::TabLifecycleController;
use crate::events::TabEvent;
use crate::host::ContentHost;
use crate::ids::{SurfaceId, WindowId};
use crate::tasks::PostedTask;
use crate::{Error, Result};
use serde::Serialize;

/// A tab's answer to its window closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Proceed,
    /// The window was hidden and deactivated instead
    HideInstead,
    /// The close was prevented; it is requested again once the tab leaves
    Defer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowCloseOutcome {
    Closed,
    Hidden,
    Deferred,
}

impl<H: ContentHost> TabLifecycleController<H> {
    /// Decide whether the tab's window may close.
    ///
    /// A pinned tab with real content protects its window while sibling
    /// windows exist and the process is not shutting down.
    pub fn will_close_window(&mut self, surface: SurfaceId) -> CloseDecision {
        let Some(record) = self.tabs.get_mut(surface) else {
            return CloseDecision::Proceed;
        };
        record.pending_close = false;
        let Some(window) = record.window_id else {
            return CloseDecision::Proceed;
        };
        let protected = record.pinned
            && !record.is_placeholder
            && !self.shutting_down
            && self.windows.len() > 1;
        if !protected {
            return CloseDecision::Proceed;
        }

        if self.config.defer_close_for_pinned {
            record.pending_close = true;
            tracing::info!("{} keeps {} open until it moves", surface, window);
            return CloseDecision::Defer;
        }

        if let Some(strip) = self.windows.get_mut(window) {
            strip.deactivate();
            strip.hide();
        }
        tracing::info!("Hiding {} instead of closing it, {} is pinned", window, surface);
        self.emit(TabEvent::WindowHidden { window });
        CloseDecision::HideInstead
    }

    /// Post a close of the tab's window if a close was deferred on it
    pub(crate) fn maybe_request_window_close(&mut self, surface: SurfaceId) {
        let Some(record) = self.tabs.get_mut(surface) else {
            return;
        };
        if !record.pending_close {
            return;
        }
        let Some(window) = record.window_id else {
            return;
        };
        record.pending_close = false;
        self.tasks.post(PostedTask::CloseWindow(window));
        self.emit(TabEvent::CloseRequested { window });
    }

    /// Close a window, destroying its tabs, unless one of them protects it.
    pub fn close_window(&mut self, id: WindowId) -> Result<WindowCloseOutcome> {
        let surfaces = self
            .windows
            .get(id)
            .ok_or(Error::WindowNotFound(id))?
            .surfaces();

        let mut outcome = WindowCloseOutcome::Closed;
        for surface in &surfaces {
            match self.will_close_window(*surface) {
                CloseDecision::Proceed => {}
                CloseDecision::HideInstead => outcome = WindowCloseOutcome::Hidden,
                CloseDecision::Defer => outcome = WindowCloseOutcome::Deferred,
            }
            if outcome != WindowCloseOutcome::Closed {
                break;
            }
        }
        if outcome != WindowCloseOutcome::Closed {
            self.dispatch_pending();
            return Ok(outcome);
        }

        for surface in surfaces {
            self.destroy_tab(surface);
        }
        self.windows.remove(id);
        self.dispatch_pending();
        tracing::info!("Closed {}", id);
        Ok(outcome)
    }
}
