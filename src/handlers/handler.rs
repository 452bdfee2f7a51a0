//! # Handler abstraction.
//!
//! This module defines the [`Handler`] trait (async, cancelable). The common
//! handle type is [`HandlerRef`], an `Arc<dyn Handler>` suitable for sharing
//! between the registry and in-flight dispatches.
//!
//! A handler receives a [`CancellationToken`]: on the synchronous path it is
//! the publisher's own token, on the asynchronous path a fresh token that the
//! bus cancels when the configured timeout elapses. Handlers that may run
//! long should periodically check it and bail out with
//! [`HandlerError::Canceled`].

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::EventRef;

/// # A subscriber's event callback.
///
/// A `Handler` has a single async [`handle`](Handler::handle) method invoked
/// once per matching published event. Returning an `Err` does not abort
/// dispatch to other handlers; the error is routed to the bus's error hook.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use eventvisor::{EventRef, Handler, HandlerError};
///
/// struct AuditLog;
///
/// #[async_trait]
/// impl Handler for AuditLog {
///     async fn handle(
///         &self,
///         _ctx: CancellationToken,
///         event: EventRef,
///     ) -> Result<(), HandlerError> {
///         println!("audit: {}", event.topic());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Implementations that run long should check `ctx.is_cancelled()` and
    /// exit promptly; the asynchronous dispatch path cancels the token when
    /// its deadline passes.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), HandlerError>;
}

/// Shared handle to a handler (`Arc<dyn Handler>`).
pub type HandlerRef = Arc<dyn Handler>;
