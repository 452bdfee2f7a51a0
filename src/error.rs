//! Error types used by the event bus and its handlers.
//!
//! This module defines two main error enums:
//!
//! - [`HandlerError`] — failures reported by individual handler invocations.
//! - [`DispatchError`] — what the bus delivers to the configured error hook.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Nothing here propagates out of `publish`/`flush`: the error hook is the only
//! user-visible failure channel.

use std::sync::Arc;

use thiserror::Error;

/// # Errors reported by handler execution.
///
/// A handler returns one of these to signal that it could not process the
/// event. The bus never escalates them; they are routed to the error hook.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed cancellation (e.g. the async dispatch timeout fired)
    /// and bailed out without completing.
    #[error("context cancelled")]
    Canceled,
}

impl HandlerError {
    /// Convenience constructor for [`HandlerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { error } => format!("error: {error}"),
            HandlerError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Failures delivered to the error hook.
///
/// These carry the topic of the event whose dispatch failed, so a hook can
/// discriminate without parsing messages.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler returned an error; routed here instead of propagating.
    #[error("handler error on topic {topic}: {source}")]
    Handler {
        /// Topic of the event being dispatched.
        topic: Arc<str>,
        /// The handler's reported failure.
        #[source]
        source: HandlerError,
    },

    /// An asynchronous handler panicked; the panic was caught and converted.
    ///
    /// Only the async path contains panics — a panic in a synchronous handler
    /// unwinds into the `publish` caller.
    #[error("handler panicked on topic {topic}: {reason}")]
    Panicked {
        /// Topic of the event being dispatched.
        topic: Arc<str>,
        /// Best-effort rendering of the panic payload.
        reason: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::{DispatchError, HandlerError};
    ///
    /// let err = DispatchError::Handler {
    ///     topic: "orders.created".into(),
    ///     source: HandlerError::fail("boom"),
    /// };
    /// assert_eq!(err.as_label(), "dispatch_handler_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Handler { .. } => "dispatch_handler_error",
            DispatchError::Panicked { .. } => "dispatch_panicked",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Handler { topic, source } => {
                format!("topic={topic}; {}", source.as_message())
            }
            DispatchError::Panicked { topic, reason } => {
                format!("topic={topic}; panic: {reason}")
            }
        }
    }

    /// Topic of the event whose dispatch produced this failure.
    pub fn topic(&self) -> &str {
        match self {
            DispatchError::Handler { topic, .. } => topic,
            DispatchError::Panicked { topic, .. } => topic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_labels() {
        assert_eq!(HandlerError::fail("x").as_label(), "handler_failed");
        assert_eq!(HandlerError::Canceled.as_label(), "handler_canceled");
    }

    #[test]
    fn test_dispatch_error_carries_topic() {
        let err = DispatchError::Panicked {
            topic: "orders.created".into(),
            reason: "boom".into(),
        };
        assert_eq!(err.topic(), "orders.created");
        assert_eq!(err.as_label(), "dispatch_panicked");
        assert!(err.as_message().contains("boom"));
    }

    #[test]
    fn test_handler_error_display_via_source() {
        let err = DispatchError::Handler {
            topic: "t".into(),
            source: HandlerError::fail("db unavailable"),
        };
        assert!(err.to_string().contains("db unavailable"));
    }
}
