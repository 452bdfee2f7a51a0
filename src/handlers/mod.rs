//! # Event handlers and the middleware chain.
//!
//! This module provides the [`Handler`] trait, the function-backed
//! [`HandlerFn`] adapter, the [`Middleware`] chain that wraps every handler
//! invocation, and the per-subscription types ([`SubscribeOptions`],
//! [`Unsubscribe`]).
//!
//! ## Architecture
//! ```text
//! publish(event)
//!     │
//!     ▼ per subscription
//! MiddlewareChain::wrap(base)            (first appended = outermost)
//!     │
//!     ▼
//! mw1( mw2( ... base ) ).handle(ctx, event)
//! ```

mod handler;
mod handler_fn;
mod middleware;
mod subscription;

pub use handler::{Handler, HandlerRef};
pub use handler_fn::HandlerFn;
pub use middleware::Middleware;
pub use subscription::{HandlerId, SubscribeOptions, Unsubscribe};

pub(crate) use middleware::MiddlewareChain;
pub(crate) use subscription::Subscription;
