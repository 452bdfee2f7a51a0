//! # In-flight async dispatch tracker.
//!
//! A gauge of asynchronous handler invocations that have been scheduled but
//! not yet finished. `wait` is a completion barrier for work already entered,
//! not a quiescence lock: new dispatches may enter while a waiter waits.
//!
//! ## Rules
//! - `enter` before spawning; the returned guard travels into the spawned
//!   task and decrements on drop, so every exit path counts down.
//! - `wait` resolves once the count reaches zero (immediately if it already
//!   is zero).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Synchronized counter of in-flight asynchronous dispatches.
#[derive(Default)]
pub(crate) struct Inflight {
    count: AtomicUsize,
    notify: Notify,
}

/// Decrements the gauge when dropped.
pub(crate) struct InflightGuard {
    inflight: Arc<Inflight>,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        if self.inflight.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inflight.notify.notify_waiters();
        }
    }
}

impl Inflight {
    /// Records one newly scheduled dispatch; the guard counts it back down.
    pub(crate) fn enter(self: Arc<Self>) -> InflightGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        InflightGuard { inflight: self }
    }

    /// Current number of in-flight dispatches.
    #[cfg(test)]
    pub(crate) fn current(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Resolves once the gauge reaches zero.
    pub(crate) async fn wait(&self) {
        loop {
            // Register before checking, otherwise a guard dropped between the
            // check and the await would be a lost wakeup.
            let notified = self.notify.notified();
            if self.count.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_idle() {
        let inflight = Arc::new(Inflight::default());
        inflight.wait().await;
        assert_eq!(inflight.current(), 0);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_guards_drop() {
        let inflight = Arc::new(Inflight::default());
        let first = Arc::clone(&inflight).enter();
        let second = Arc::clone(&inflight).enter();
        assert_eq!(inflight.current(), 2);

        let releaser = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(first);
            drop(second);
        });

        inflight.wait().await;
        assert_eq!(inflight.current(), 0);
        releaser.await.unwrap();
    }

    #[tokio::test]
    async fn test_enter_after_wait_started_is_also_awaited() {
        let inflight = Arc::new(Inflight::default());
        let outer = Arc::clone(&inflight).enter();

        let tracked = Arc::clone(&inflight);
        let churn = tokio::spawn(async move {
            let inner = Arc::clone(&tracked).enter();
            tokio::time::sleep(Duration::from_millis(5)).await;
            drop(inner);
            drop(outer);
        });

        inflight.wait().await;
        assert_eq!(inflight.current(), 0);
        churn.await.unwrap();
    }
}
