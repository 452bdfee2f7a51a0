//! # Subscription types.
//!
//! A subscription binds a handler to a topic, together with its dispatch
//! options (synchronous vs. asynchronous). `subscribe` returns the allocated
//! [`HandlerId`] plus an [`Unsubscribe`] handle that removes exactly that
//! subscription.

use std::sync::{Arc, Weak};

use crate::bus::EventBus;
use crate::handlers::handler::HandlerRef;

/// Identifier of one live subscription, unique per bus instance.
///
/// Allocated from a monotonically increasing per-bus counter.
pub type HandlerId = u64;

/// Per-subscription dispatch options.
///
/// # Example
/// ```
/// use eventvisor::SubscribeOptions;
///
/// let opts = SubscribeOptions::asynchronous();
/// assert!(opts.asynchronous);
/// assert!(!SubscribeOptions::default().asynchronous);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SubscribeOptions {
    /// Dispatch this handler on an independently spawned task instead of
    /// inline on the publisher's task.
    pub asynchronous: bool,
}

impl SubscribeOptions {
    /// Options for an asynchronously dispatched subscription.
    pub fn asynchronous() -> Self {
        Self { asynchronous: true }
    }
}

/// Registry entry: a base handler plus its dispatch options.
#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) handler: HandlerRef,
    pub(crate) asynchronous: bool,
}

/// Handle that removes one subscription from its bus.
///
/// Consuming [`call`](Unsubscribe::call) is equivalent to
/// [`EventBus::unsubscribe`](crate::EventBus::unsubscribe) with the captured
/// topic and id. Holds only a `Weak` reference, so it neither keeps the bus
/// alive nor dangles: after the bus is dropped, `call` is a no-op.
///
/// Dropping the handle without calling it leaves the subscription in place.
pub struct Unsubscribe {
    bus: Weak<EventBus>,
    topic: Arc<str>,
    id: HandlerId,
}

impl Unsubscribe {
    pub(crate) fn new(bus: Weak<EventBus>, topic: Arc<str>, id: HandlerId) -> Self {
        Self { bus, topic, id }
    }

    /// The id of the subscription this handle removes.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Removes the subscription. No-op if it is already gone or the bus has
    /// been dropped.
    pub async fn call(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(&self.topic, self.id).await;
        }
    }
}
