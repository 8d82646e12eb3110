//! View lifetime.
//!
//! Every view owns a [`ViewScope`]. Calls the view awaits go through
//! [`ViewScope::guard`]; once the view is torn down, pending and future
//! guarded calls resolve to `None` and the view drops their results.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct ScopeInner {
    torn_down: AtomicBool,
    notify: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the scope. Idempotent.
    pub fn teardown(&self) {
        if !self.inner.torn_down.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }

    /// Run `fut` unless the scope ends first.
    pub async fn guard<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent teardown is not missed.
        notified.as_mut().enable();

        if self.is_torn_down() {
            return None;
        }

        tokio::select! {
            biased;
            _ = &mut notified => None,
            out = fut => Some(out),
        }
    }
}
