//! # Bus configuration.
//!
//! [`Config`] defines how the bus treats asynchronous dispatches (timeout)
//! and where routed failures go (error hook).
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use std::sync::Arc;
//! use eventvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.async_timeout = Duration::from_secs(5);
//! cfg.error_hook = Arc::new(|err| eprintln!("{err}"));
//!
//! assert_eq!(cfg.async_timeout, Duration::from_secs(5));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::DispatchError;

/// Callback invoked with every failure the bus absorbs.
///
/// Runs on whichever task encountered the failure (the publisher's task for
/// synchronous handlers, the spawned dispatch task for asynchronous ones);
/// it must not block for long. Its own panics are not contained.
pub type ErrorHook = Arc<dyn Fn(DispatchError) + Send + Sync>;

/// Configuration for an [`EventBus`](crate::EventBus).
///
/// Controls the asynchronous dispatch deadline and the error hook.
#[derive(Clone)]
pub struct Config {
    /// Deadline for a single asynchronous handler invocation.
    ///
    /// When it elapses, the handler's cancellation token is cancelled; the
    /// handler itself is never forcibly terminated. `Duration::ZERO` disables
    /// the timeout entirely.
    pub async_timeout: Duration,
    /// Callback receiving every [`DispatchError`] the bus absorbs.
    pub error_hook: ErrorHook,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `async_timeout = 30s`
    /// - `error_hook` logs through `tracing::error!`
    fn default() -> Self {
        Self {
            async_timeout: Duration::from_secs(30),
            error_hook: Arc::new(default_error_hook),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("async_timeout", &self.async_timeout)
            .finish_non_exhaustive()
    }
}

fn default_error_hook(err: DispatchError) {
    tracing::error!(
        target: "eventvisor",
        topic = err.topic(),
        label = err.as_label(),
        "{}",
        err.as_message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.async_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_omits_hook() {
        let rendered = format!("{:?}", Config::default());
        assert!(rendered.contains("async_timeout"));
        assert!(!rendered.contains("error_hook"));
    }
}
