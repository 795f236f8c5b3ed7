//! Event queue: grids push events, the host drains them.

use std::collections::VecDeque;

use log::trace;

use super::message::TreeGridEvent;

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// FIFO of pending [`TreeGridEvent`]s.
///
/// The grid pushes events as it mutates state; the host drains them after
/// each operation and routes them to whatever listens.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<TreeGridEvent>,
}

impl EventQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue an event.
    pub fn push(&mut self, event: TreeGridEvent) {
        trace!("event queued: {event}");
        self.queue.push_back(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<TreeGridEvent> {
        self.queue.drain(..).collect()
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_queue_is_empty() {
        let q = EventQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.pending_count(), 0);
    }

    #[test]
    fn push_and_drain_preserves_order() {
        let mut q = EventQueue::new();
        q.push(TreeGridEvent::ActiveChanged(false));
        q.push(TreeGridEvent::Loaded);
        q.push(TreeGridEvent::ActiveChanged(true));
        assert_eq!(q.pending_count(), 3);

        let events = q.drain();
        assert_eq!(
            events,
            vec![
                TreeGridEvent::ActiveChanged(false),
                TreeGridEvent::Loaded,
                TreeGridEvent::ActiveChanged(true),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn drain_empty() {
        let mut q = EventQueue::default();
        assert!(q.drain().is_empty());
    }
}
