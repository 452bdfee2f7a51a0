//! # Event capability.
//!
//! An event is any value that can name its topic. The common handle type is
//! [`EventRef`], an `Arc<dyn Event>` suitable for fan-out across handler
//! invocations without cloning the payload.
//!
//! Events are immutable after construction: the bus only reads the topic and
//! hands shared references to handlers. Handlers recover the concrete payload
//! with [`downcast_ref`](Event::downcast_ref).

use std::any::Any;
use std::sync::Arc;

/// # A publishable event.
///
/// The bus only requires a topic; the payload is whatever the implementing
/// type carries.
///
/// # Example
/// ```
/// use eventvisor::Event;
///
/// struct OrderCreated {
///     order_id: u64,
/// }
///
/// impl Event for OrderCreated {
///     fn topic(&self) -> &str {
///         "orders.created"
///     }
/// }
///
/// let ev: &dyn Event = &OrderCreated { order_id: 42 };
/// assert_eq!(ev.topic(), "orders.created");
/// assert_eq!(ev.downcast_ref::<OrderCreated>().unwrap().order_id, 42);
/// ```
pub trait Event: Any + Send + Sync {
    /// Returns the topic this event is published under.
    ///
    /// Topics are matched by value equality; there is no wildcard or
    /// hierarchical matching.
    fn topic(&self) -> &str;
}

impl dyn Event {
    /// Returns the concrete event when it is a `T`.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// Shared handle to an event (`Arc<dyn Event>`).
pub type EventRef = Arc<dyn Event>;
