//! # The event bus.
//!
//! [`EventBus`] owns the topic→subscription registry, the middleware chain,
//! and the in-flight tracker for asynchronous dispatches.

mod core;
mod inflight;

pub use core::EventBus;
