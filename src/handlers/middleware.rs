//! # Middleware chain.
//!
//! A middleware is a transform `HandlerRef -> HandlerRef`. The chain wraps
//! every handler invocation on every publish, composing outer-to-inner in
//! registration order: the first-appended middleware observes the call first
//! and the result last.
//!
//! ## Rules
//! - Appending is safe from any number of concurrent callers.
//! - Each publish snapshots the chain once; a middleware appended while a
//!   publish is in flight does not retroactively apply to that publish.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::handlers::handler::HandlerRef;

/// A handler-wrapping transform.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use eventvisor::{EventRef, HandlerFn, HandlerRef, Middleware};
///
/// let logging: Middleware = Arc::new(|next: HandlerRef| -> HandlerRef {
///     HandlerFn::arc(move |ctx, event: EventRef| {
///         let next = Arc::clone(&next);
///         async move {
///             println!("-> {}", event.topic());
///             next.handle(ctx, event).await
///         }
///     })
/// });
/// ```
pub type Middleware = Arc<dyn Fn(HandlerRef) -> HandlerRef + Send + Sync>;

/// Append-only ordered list of middlewares.
#[derive(Default)]
pub(crate) struct MiddlewareChain {
    chain: RwLock<Vec<Middleware>>,
}

impl MiddlewareChain {
    /// Appends a middleware to the end of the chain (innermost so far).
    pub(crate) async fn append(&self, mw: Middleware) {
        self.chain.write().await.push(mw);
    }

    /// Returns a consistent snapshot of the chain for one publish.
    pub(crate) async fn snapshot(&self) -> Vec<Middleware> {
        self.chain.read().await.clone()
    }

    /// Wraps a base handler through a snapshot, first-appended outermost.
    pub(crate) fn wrap(snapshot: &[Middleware], base: HandlerRef) -> HandlerRef {
        snapshot
            .iter()
            .rev()
            .fold(base, |handler, mw| (**mw)(handler))
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::error::HandlerError;
    use crate::events::{Event, EventRef};
    use crate::handlers::handler_fn::HandlerFn;

    struct Ping;

    impl Event for Ping {
        fn topic(&self) -> &str {
            "ping"
        }
    }

    fn tracing_mw(tag: &'static str, log: Arc<tokio::sync::Mutex<Vec<String>>>) -> Middleware {
        Arc::new(move |next: HandlerRef| -> HandlerRef {
            let log = Arc::clone(&log);
            HandlerFn::arc(move |ctx, event| {
                let next = Arc::clone(&next);
                let log = Arc::clone(&log);
                async move {
                    log.lock().await.push(format!("{tag}-enter"));
                    let res = next.handle(ctx, event).await;
                    log.lock().await.push(format!("{tag}-exit"));
                    res
                }
            })
        })
    }

    #[tokio::test]
    async fn test_first_appended_is_outermost() {
        let log = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let chain = MiddlewareChain::default();
        chain.append(tracing_mw("m1", Arc::clone(&log))).await;
        chain.append(tracing_mw("m2", Arc::clone(&log))).await;

        let base_log = Arc::clone(&log);
        let base: HandlerRef = HandlerFn::arc(move |_ctx, _event| {
            let log = Arc::clone(&base_log);
            async move {
                log.lock().await.push("base".to_string());
                Ok::<_, HandlerError>(())
            }
        });

        let snapshot = chain.snapshot().await;
        let wrapped = MiddlewareChain::wrap(&snapshot, base);
        let ev: EventRef = Arc::new(Ping);
        wrapped.handle(CancellationToken::new(), ev).await.unwrap();

        assert_eq!(
            *log.lock().await,
            vec!["m1-enter", "m2-enter", "base", "m2-exit", "m1-exit"]
        );
    }

    #[tokio::test]
    async fn test_snapshot_unaffected_by_later_append() {
        let log = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let chain = MiddlewareChain::default();
        chain.append(tracing_mw("m1", Arc::clone(&log))).await;

        let snapshot = chain.snapshot().await;
        chain.append(tracing_mw("m2", Arc::clone(&log))).await;

        let base: HandlerRef = HandlerFn::arc(|_ctx, _event| async { Ok::<_, HandlerError>(()) });
        let wrapped = MiddlewareChain::wrap(&snapshot, base);
        let ev: EventRef = Arc::new(Ping);
        wrapped.handle(CancellationToken::new(), ev).await.unwrap();

        let entries = log.lock().await;
        assert!(entries.iter().all(|e| !e.starts_with("m2")));
    }
}
