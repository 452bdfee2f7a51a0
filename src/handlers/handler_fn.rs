//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(CancellationToken, EventRef) -> Fut`,
//! producing a fresh future per invocation. This avoids shared mutable state:
//! each dispatch owns its own future, and shared state (call counters,
//! connections) is introduced explicitly via `Arc<...>` inside the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{EventRef, HandlerError, HandlerFn, HandlerRef};
//!
//! let h: HandlerRef = HandlerFn::arc(|_ctx: CancellationToken, event: EventRef| async move {
//!     if event.topic() == "orders.created" {
//!         // do work...
//!     }
//!     Ok::<_, HandlerError>(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::EventRef;
use crate::handlers::handler::Handler;

/// Function-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a
    /// [`HandlerRef`](crate::HandlerRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(CancellationToken, EventRef) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), HandlerError> {
        (self.f)(ctx, event).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::events::Event;

    struct Ping;

    impl Event for Ping {
        fn topic(&self) -> &str {
            "ping"
        }
    }

    #[tokio::test]
    async fn test_closure_receives_event() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);

        let h = HandlerFn::arc(move |_ctx, event: EventRef| {
            let seen = Arc::clone(&seen);
            async move {
                assert_eq!(event.topic(), "ping");
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        });

        let ev: EventRef = Arc::new(Ping);
        h.handle(CancellationToken::new(), ev).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_closure_errors_are_returned() {
        let h = HandlerFn::new(|_ctx, _event| async { Err(HandlerError::fail("nope")) });

        let ev: EventRef = Arc::new(Ping);
        let err = h.handle(CancellationToken::new(), ev).await.unwrap_err();
        assert_eq!(err.as_label(), "handler_failed");
    }
}
