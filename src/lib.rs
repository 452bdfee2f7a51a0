//! # eventvisor
//!
//! **Eventvisor** is a lightweight in-process publish/subscribe event
//! dispatcher for async Rust.
//!
//! Producers publish typed events by topic; independently registered handlers
//! receive them synchronously (inline on the publisher's task) or
//! asynchronously (on a spawned, tracked task with its own timeout and panic
//! containment). It is a library, not a service: no network boundary, no
//! persistence, best-effort delivery to the handlers registered at call time.
//!
//! ## Architecture
//! ```text
//!  publisher                          EventBus
//!     │                                  │
//!     │ publish(ctx, event)              │
//!     ├─────────────────────────────────►│
//!     │                     ┌────────────┴────────────┐
//!     │                     │ registry snapshot       │  topic → {id → subscription}
//!     │                     │ middleware snapshot     │  first appended = outermost
//!     │                     └────────────┬────────────┘
//!     │                                  │ per subscription
//!     │                 ┌────────────────┼─────────────────┐
//!     │                 ▼ sync           ▼ async           ▼ async
//!     │          wrapped.handle()   tokio::spawn       tokio::spawn
//!     │          (caller's token)   (fresh token,      (fresh token,
//!     │                 │            timeout watchdog,  timeout watchdog,
//!     │                 │            catch_unwind)      catch_unwind)
//!     │                 │                │                 │
//!     │   Err ──► error hook             └──── Inflight ───┘
//!     │                                        │
//!     │ wait() ────────────────────────────────┘
//! ```
//!
//! ## Dispatch rules
//! - Broadcast semantics: every subscription of a topic receives every event
//!   published to that topic; nothing is "consumed".
//! - No ordering guarantee among handlers of one topic, none across topics.
//! - `subscribe` / `unsubscribe` / `publish` / `flush` never fail; the only
//!   failure channel is the configured error hook.
//! - Asynchronous dispatch detaches from the publisher's cancellation and
//!   runs under the bus's own timeout; panics there are caught and reported.
//!   A panic in a synchronous handler unwinds into the `publish` caller.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{
//!     Event, EventBus, EventQueue, EventRef, HandlerError, HandlerFn, SubscribeOptions,
//! };
//!
//! struct OrderCreated {
//!     order_id: u64,
//! }
//!
//! impl Event for OrderCreated {
//!     fn topic(&self) -> &str {
//!         "orders.created"
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = EventBus::new();
//! let ctx = CancellationToken::new();
//!
//! // Synchronous subscription: runs inline during publish.
//! let (_id, unsub) = bus
//!     .subscribe(
//!         "orders.created",
//!         HandlerFn::arc(|_ctx, event: EventRef| async move {
//!             let order = event.downcast_ref::<OrderCreated>().unwrap();
//!             println!("created: {}", order.order_id);
//!             Ok::<_, HandlerError>(())
//!         }),
//!     )
//!     .await;
//!
//! // Asynchronous subscription: spawned per event, awaited via wait().
//! bus.subscribe_with(
//!     "orders.created",
//!     HandlerFn::arc(|_ctx, _event| async { Ok::<_, HandlerError>(()) }),
//!     SubscribeOptions::asynchronous(),
//! )
//! .await;
//!
//! bus.publish(&ctx, Arc::new(OrderCreated { order_id: 42 })).await;
//!
//! // Deferred batch publication through a queue.
//! let queue = EventQueue::new();
//! queue.enqueue(Arc::new(OrderCreated { order_id: 43 })).await;
//! bus.flush(&ctx, &queue).await;
//!
//! bus.wait().await;
//! unsub.call().await;
//! # }
//! ```

mod bus;
mod config;
mod error;
mod events;
mod handlers;

pub use bus::EventBus;
pub use config::{Config, ErrorHook};
pub use error::{DispatchError, HandlerError};
pub use events::{Event, EventQueue, EventRef};
pub use handlers::{
    Handler, HandlerFn, HandlerId, HandlerRef, Middleware, SubscribeOptions, Unsubscribe,
};
