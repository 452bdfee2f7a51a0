//! # The event dispatcher.
//!
//! [`EventBus`] routes published events to every handler subscribed to the
//! event's topic, wrapping each invocation through the middleware chain.
//!
//! ## Architecture
//! ```text
//! publish(ctx, event)
//!     │
//!     ├─ snapshot subscriptions for event.topic()   (read lock, then release)
//!     ├─ snapshot middleware chain
//!     │
//!     ▼ per subscription: wrapped = chain.wrap(base)
//!     ├─ sync  ──► wrapped.handle(ctx, event).await      (inline, caller's token)
//!     │                └─ Err → error hook
//!     └─ async ──► inflight.enter() ─► tokio::spawn
//!                      ├─ fresh token (detached from ctx)
//!                      ├─ watchdog cancels token at async_timeout
//!                      ├─ catch_unwind around the invocation
//!                      ├─ Err/panic → error hook
//!                      └─ guard drop → inflight.leave()
//! ```
//!
//! ## Rules
//! - Subscriptions are copied out before iterating, so a handler may itself
//!   subscribe or unsubscribe without deadlocking the in-flight publish.
//! - No ordering guarantee among handlers of one topic (registry iteration
//!   order is unspecified).
//! - `publish` never fails; absence of listeners is a normal condition.
//! - Caller cancellation after `publish` returns never aborts async work:
//!   the spawned dispatch runs under its own token.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::RwLock;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::bus::inflight::Inflight;
use crate::config::{Config, ErrorHook};
use crate::error::DispatchError;
use crate::events::{EventQueue, EventRef};
use crate::handlers::{
    HandlerId, HandlerRef, Middleware, MiddlewareChain, SubscribeOptions, Subscription,
    Unsubscribe,
};

/// In-process publish/subscribe dispatcher.
///
/// Constructed via [`EventBus::new`] / [`EventBus::with_config`], both of
/// which return `Arc<EventBus>`; one bus per logical event domain, passed
/// explicitly to producers and consumers.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use eventvisor::{Event, EventBus, EventRef, HandlerError, HandlerFn};
///
/// struct OrderCreated;
///
/// impl Event for OrderCreated {
///     fn topic(&self) -> &str {
///         "orders.created"
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let bus = EventBus::new();
///
/// let (_id, _unsub) = bus
///     .subscribe(
///         "orders.created",
///         HandlerFn::arc(|_ctx, event: EventRef| async move {
///             assert_eq!(event.topic(), "orders.created");
///             Ok::<_, HandlerError>(())
///         }),
///     )
///     .await;
///
/// bus.publish(&CancellationToken::new(), Arc::new(OrderCreated)).await;
/// bus.wait().await;
/// # }
/// ```
pub struct EventBus {
    config: Config,
    registry: RwLock<HashMap<Arc<str>, HashMap<HandlerId, Subscription>>>,
    middleware: MiddlewareChain,
    inflight: Arc<Inflight>,
    next_id: AtomicU64,
    // Back-reference handed to Unsubscribe handles.
    weak: Weak<EventBus>,
}

impl EventBus {
    /// Creates a bus with the default [`Config`].
    pub fn new() -> Arc<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(config: Config) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            registry: RwLock::new(HashMap::new()),
            middleware: MiddlewareChain::default(),
            inflight: Arc::new(Inflight::default()),
            next_id: AtomicU64::new(0),
            weak: weak.clone(),
        })
    }

    /// Subscribes a synchronously dispatched handler under a topic.
    ///
    /// Never fails; a previously unseen topic gets its registry entry lazily.
    /// Returns the allocated [`HandlerId`] and an [`Unsubscribe`] handle that
    /// removes exactly this subscription.
    pub async fn subscribe(
        &self,
        topic: impl Into<Arc<str>>,
        handler: HandlerRef,
    ) -> (HandlerId, Unsubscribe) {
        self.subscribe_with(topic, handler, SubscribeOptions::default())
            .await
    }

    /// Subscribes a handler with explicit [`SubscribeOptions`].
    pub async fn subscribe_with(
        &self,
        topic: impl Into<Arc<str>>,
        handler: HandlerRef,
        opts: SubscribeOptions,
    ) -> (HandlerId, Unsubscribe) {
        let topic: Arc<str> = topic.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let sub = Subscription {
            handler,
            asynchronous: opts.asynchronous,
        };

        {
            let mut registry = self.registry.write().await;
            registry
                .entry(Arc::clone(&topic))
                .or_default()
                .insert(id, sub);
        }

        tracing::debug!(
            target: "eventvisor",
            topic = %topic,
            id,
            asynchronous = opts.asynchronous,
            "subscribed"
        );

        let unsub = Unsubscribe::new(self.weak.clone(), topic, id);
        (id, unsub)
    }

    /// Removes one subscription.
    ///
    /// No-op when the topic or id is absent. The topic's registry entry is
    /// dropped once its last subscription goes, so churn does not grow the
    /// registry.
    pub async fn unsubscribe(&self, topic: &str, id: HandlerId) {
        let mut registry = self.registry.write().await;
        if let Some(subs) = registry.get_mut(topic) {
            if subs.remove(&id).is_some() {
                tracing::debug!(target: "eventvisor", topic, id, "unsubscribed");
            }
            if subs.is_empty() {
                registry.remove(topic);
            }
        }
    }

    /// Appends a middleware to the chain.
    ///
    /// The first-appended middleware is the outermost wrapper of every
    /// subsequent handler invocation; publishes already in flight keep the
    /// chain they snapshotted.
    pub async fn use_middleware(&self, mw: Middleware) {
        self.middleware.append(mw).await;
    }

    /// Publishes an event to every handler subscribed to its topic.
    ///
    /// Synchronous subscriptions run inline under the caller's token; the
    /// call blocks until each of them (middleware included) finishes.
    /// Asynchronous subscriptions are spawned and tracked; use
    /// [`wait`](Self::wait) to await their completion. Handler errors go to
    /// the error hook; a panic in a synchronous handler unwinds into the
    /// caller.
    pub async fn publish(&self, ctx: &CancellationToken, event: EventRef) {
        let subs: Vec<Subscription> = {
            let registry = self.registry.read().await;
            match registry.get(event.topic()) {
                Some(topic_subs) => topic_subs.values().cloned().collect(),
                None => return,
            }
        };

        let chain = self.middleware.snapshot().await;
        let topic: Arc<str> = Arc::from(event.topic());

        for sub in subs {
            let wrapped = MiddlewareChain::wrap(&chain, Arc::clone(&sub.handler));

            if sub.asynchronous {
                let guard = Arc::clone(&self.inflight).enter();
                let hook = Arc::clone(&self.config.error_hook);
                let deadline = self.config.async_timeout;
                let topic = Arc::clone(&topic);
                let event = Arc::clone(&event);
                tokio::spawn(async move {
                    Self::dispatch_detached(hook, deadline, topic, event, wrapped).await;
                    drop(guard);
                });
                continue;
            }

            if let Err(err) = wrapped.handle(ctx.clone(), Arc::clone(&event)).await {
                self.report(DispatchError::Handler {
                    topic: Arc::clone(&topic),
                    source: err,
                });
            }
        }
    }

    /// Drains the queue once and publishes each event in FIFO order.
    ///
    /// Does not wait for asynchronous handlers triggered by the drained
    /// events; pair with [`wait`](Self::wait) when that matters.
    pub async fn flush(&self, ctx: &CancellationToken, queue: &EventQueue) {
        for event in queue.release().await {
            self.publish(ctx, event).await;
        }
    }

    /// Resolves once every in-flight asynchronous dispatch has finished
    /// (success, reported error, timeout, or caught panic).
    ///
    /// This is a completion barrier, not a quiescence lock: dispatches
    /// scheduled while waiting are awaited too.
    pub async fn wait(&self) {
        self.inflight.wait().await;
    }

    /// Number of live subscriptions under a topic.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .read()
            .await
            .get(topic)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// One detached asynchronous invocation.
    ///
    /// Runs under a fresh token so the publisher's cancellation cannot reach
    /// it. The watchdog cancels that token at the configured deadline; the
    /// handler future is still awaited to completion, never dropped mid-poll
    /// (a non-cooperating handler is not forcibly terminated).
    async fn dispatch_detached(
        hook: ErrorHook,
        deadline: Duration,
        topic: Arc<str>,
        event: EventRef,
        handler: HandlerRef,
    ) {
        let ctx = CancellationToken::new();

        let watchdog = if deadline > Duration::ZERO {
            let token = ctx.clone();
            Some(tokio::spawn(async move {
                time::sleep(deadline).await;
                token.cancel();
            }))
        } else {
            None
        };

        let invocation = handler.handle(ctx, event);
        let outcome = std::panic::AssertUnwindSafe(invocation).catch_unwind().await;

        if let Some(w) = &watchdog {
            w.abort();
        }

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                (*hook)(DispatchError::Handler { topic, source: err });
            }
            Err(panic_payload) => {
                let reason = {
                    let any = &*panic_payload;
                    if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    }
                };
                (*hook)(DispatchError::Panicked { topic, reason });
            }
        }
    }

    /// Routes one absorbed failure to the configured hook.
    fn report(&self, err: DispatchError) {
        (*self.config.error_hook)(err);
    }
}
