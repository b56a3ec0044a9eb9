use crate::ids::{SurfaceId, WindowId};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Work posted to run after the current notification has returned.
///
/// Tasks cannot be cancelled; each one re-checks its preconditions when it
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedTask {
    /// Destroy the surface if it is still a placeholder
    DestroyPlaceholder(SurfaceId),
    /// Destroy a stand-in that is no longer in any window
    ReapDetached(SurfaceId),
    /// Close the window if it still exists
    CloseWindow(WindowId),
}

/// FIFO queue of posted tasks for the UI sequence.
#[derive(Debug)]
pub struct TaskQueue {
    tx: UnboundedSender<PostedTask>,
    rx: UnboundedReceiver<PostedTask>,
    pending: usize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self { tx, rx, pending: 0 }
    }

    pub fn post(&mut self, task: PostedTask) {
        tracing::debug!("Posting task: {:?}", task);
        // The queue owns its receiver, so the send cannot fail
        if self.tx.send(task).is_ok() {
            self.pending += 1;
        }
    }

    pub fn next(&mut self) -> Option<PostedTask> {
        let task = self.rx.try_recv().ok()?;
        self.pending -= 1;
        Some(task)
    }

    pub fn len(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_run_in_post_order() {
        let mut queue = TaskQueue::new();
        queue.post(PostedTask::DestroyPlaceholder(SurfaceId(1)));
        queue.post(PostedTask::CloseWindow(WindowId(2)));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.next(),
            Some(PostedTask::DestroyPlaceholder(SurfaceId(1)))
        );
        assert_eq!(queue.next(), Some(PostedTask::CloseWindow(WindowId(2))));
        assert_eq!(queue.next(), None);
        assert!(queue.is_empty());
    }
}
