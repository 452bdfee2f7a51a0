//! # Deferred-publication queue.
//!
//! [`EventQueue`] accumulates events for later batch publication through
//! [`EventBus::flush`](crate::EventBus::flush). It is a plain FIFO buffer:
//! no deduplication, no capacity limit, no delivery logic of its own.
//!
//! ## Rules
//! - `enqueue` appends; order of release equals order of enqueue.
//! - `release` drains atomically: each event is returned by exactly one
//!   `release` call, and a release that starts after an enqueue completes
//!   always observes that event.

use tokio::sync::Mutex;

use crate::events::EventRef;

/// FIFO buffer of pending events.
#[derive(Default)]
pub struct EventQueue {
    queue: Mutex<Vec<EventRef>>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the back of the queue.
    pub async fn enqueue(&self, event: EventRef) {
        self.queue.lock().await.push(event);
    }

    /// Drains the queue, returning everything enqueued so far in FIFO order.
    ///
    /// The internal buffer is swapped for an empty one, so a second `release`
    /// without an intervening `enqueue` returns an empty vec.
    pub async fn release(&self) -> Vec<EventRef> {
        std::mem::take(&mut *self.queue.lock().await)
    }

    /// Returns the number of pending events.
    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Returns `true` when no events are pending.
    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::Event;

    struct Stamp(u32);

    impl Event for Stamp {
        fn topic(&self) -> &str {
            "stamp"
        }
    }

    #[tokio::test]
    async fn test_release_preserves_fifo_order() {
        let queue = EventQueue::new();
        for n in 0..3u32 {
            queue.enqueue(Arc::new(Stamp(n))).await;
        }

        let drained = queue.release().await;
        assert_eq!(drained.len(), 3);
        for (i, ev) in drained.iter().enumerate() {
            let stamp = ev.downcast_ref::<Stamp>().expect("stamp event");
            assert_eq!(stamp.0, i as u32, "event {i} out of order");
        }
    }

    #[tokio::test]
    async fn test_second_release_is_empty() {
        let queue = EventQueue::new();
        queue.enqueue(Arc::new(Stamp(1))).await;

        assert_eq!(queue.release().await.len(), 1);
        assert!(queue.release().await.is_empty());
    }

    #[tokio::test]
    async fn test_len_tracks_enqueue_and_release() {
        let queue = EventQueue::new();
        assert!(queue.is_empty().await);

        queue.enqueue(Arc::new(Stamp(1))).await;
        queue.enqueue(Arc::new(Stamp(2))).await;
        assert_eq!(queue.len().await, 2);

        queue.release().await;
        assert!(queue.is_empty().await);
    }
}
