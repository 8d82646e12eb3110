//! Toast notifications.
//!
//! [`NotificationStore`] owns the ordered list of visible notifications and
//! broadcasts a full snapshot of it after every change. Notifications with a
//! duration are removed by a timer task once the duration elapses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use finprod_core::NotificationId;
use finprod_events::{EventBus, InMemoryEventBus, Subscription};

/// Duration applied by [`NotificationStore::show`] when none is given.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }

    /// Auto-dismiss delay used by the per-kind shortcuts.
    pub fn default_duration(&self) -> Duration {
        match self {
            NotificationKind::Success => Duration::from_millis(3000),
            NotificationKind::Error => Duration::from_millis(5000),
            NotificationKind::Warning => Duration::from_millis(4000),
            NotificationKind::Info => Duration::from_millis(3000),
        }
    }
}

/// A visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// `None` for notifications that stay until dismissed.
    pub duration: Option<Duration>,
    pub dismissible: bool,
}

impl Notification {
    pub fn css_class(&self) -> String {
        format!("notification notification--{}", self.kind.as_str())
    }
}

/// What to show. Unset fields take the store defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Option<Duration>,
    pub dismissible: Option<bool>,
}

impl NotificationOptions {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: None,
            dismissible: None,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Never auto-dismiss.
    pub fn sticky(self) -> Self {
        self.duration(Duration::ZERO)
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }
}

#[derive(Debug)]
struct StoreInner {
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    bus: InMemoryEventBus<Vec<Notification>>,
}

/// Process-local store of visible notifications.
///
/// Cheap to clone; clones share the same list. Create one per application
/// and hand it to every view that reports feedback.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                active: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                bus: InMemoryEventBus::with_latest(Vec::new()),
            }),
        }
    }

    /// Observe the list. The subscription starts with the current snapshot,
    /// then receives one snapshot per change, oldest notification first.
    pub fn subscribe(&self) -> Subscription<Vec<Notification>> {
        // Holding the list lock keeps the replayed snapshot and the
        // following publishes in order.
        let _active = self.active();
        self.inner.bus.subscribe()
    }

    /// Current list, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.active().clone()
    }

    /// Add a notification and, if it has a non-zero duration, schedule its
    /// removal.
    pub fn show(&self, options: NotificationOptions) -> NotificationId {
        let id = NotificationId::from_raw(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let duration = options.duration.unwrap_or(DEFAULT_DURATION);
        let notification = Notification {
            id,
            kind: options.kind,
            message: options.message,
            duration: (!duration.is_zero()).then_some(duration),
            dismissible: options.dismissible.unwrap_or(true),
        };
        let delay = notification.duration;

        tracing::debug!(%id, kind = notification.kind.as_str(), "show notification");
        self.mutate(|active| {
            active.push(notification);
            true
        });

        if let Some(delay) = delay {
            self.schedule_dismiss(id, delay);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show_kind(NotificationKind::Success, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show_kind(NotificationKind::Error, message.into())
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show_kind(NotificationKind::Warning, message.into())
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show_kind(NotificationKind::Info, message.into())
    }

    pub fn success_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(NotificationOptions::new(NotificationKind::Success, message).duration(duration))
    }

    pub fn error_for(&self, message: impl Into<String>, duration: Duration) -> NotificationId {
        self.show(NotificationOptions::new(NotificationKind::Error, message).duration(duration))
    }

    /// Remove one notification. Unknown ids are ignored.
    pub fn dismiss(&self, id: NotificationId) {
        self.mutate(|active| {
            let before = active.len();
            active.retain(|n| n.id != id);
            let removed = active.len() != before;
            if removed {
                tracing::debug!(%id, "dismiss notification");
            }
            removed
        });
    }

    /// Remove every notification.
    pub fn dismiss_all(&self) {
        tracing::debug!("dismiss all notifications");
        self.mutate(|active| {
            active.clear();
            true
        });
    }

    fn show_kind(&self, kind: NotificationKind, message: String) -> NotificationId {
        self.show(
            NotificationOptions::new(kind, message)
                .duration(kind.default_duration())
                .dismissible(true),
        )
    }

    fn active(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` and publish the new snapshot if it reports a change.
    fn mutate(&self, change: impl FnOnce(&mut Vec<Notification>) -> bool) {
        let mut active = self.active();
        if change(&mut active) {
            if let Err(e) = self.inner.bus.publish(active.clone()) {
                tracing::warn!(error = ?e, "failed to publish notifications");
            }
        }
    }

    fn schedule_dismiss(&self, id: NotificationId, delay: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%id, "no async runtime; notification will not auto-dismiss");
            return;
        };

        let store: Weak<StoreInner> = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = store.upgrade() {
                NotificationStore { inner }.dismiss(id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn messages(list: &[Notification]) -> Vec<&str> {
        list.iter().map(|n| n.message.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn shortcuts_set_kind_duration_and_dismissible() {
        let store = NotificationStore::new();
        store.success("saved");
        store.error("failed");
        store.warning("careful");
        store.info("fyi");

        let list = store.snapshot();
        let kinds: Vec<_> = list.iter().map(|n| (n.kind, n.duration, n.dismissible)).collect();
        assert_eq!(
            kinds,
            vec![
                (NotificationKind::Success, Some(ms(3000)), true),
                (NotificationKind::Error, Some(ms(5000)), true),
                (NotificationKind::Warning, Some(ms(4000)), true),
                (NotificationKind::Info, Some(ms(3000)), true),
            ]
        );
        assert_eq!(list[1].css_class(), "notification notification--error");
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_and_increasing() {
        let store = NotificationStore::new();
        let a = store.info("a");
        let b = store.info("b");
        let c = store.info("c");
        assert!(a < b && b < c);
    }

    #[tokio::test(start_paused = true)]
    async fn show_defaults_to_three_seconds() {
        let store = NotificationStore::new();
        store.show(NotificationOptions::new(NotificationKind::Info, "x"));
        assert_eq!(store.snapshot()[0].duration, Some(DEFAULT_DURATION));
    }

    #[tokio::test(start_paused = true)]
    async fn auto_dismisses_after_exactly_the_duration() {
        let store = NotificationStore::new();
        store.success_for("auto", ms(3000));

        tokio::time::sleep(ms(2999)).await;
        assert_eq!(store.snapshot().len(), 1);

        tokio::time::sleep(ms(2)).await;
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_notifications_stay() {
        let store = NotificationStore::new();
        store.show(NotificationOptions::new(NotificationKind::Warning, "stay").sticky());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(messages(&store.snapshot()), vec!["stay"]);
        assert_eq!(store.snapshot()[0].duration, None);
    }

    #[tokio::test(start_paused = true)]
    async fn list_reflects_live_notifications_in_insertion_order() {
        let store = NotificationStore::new();
        store.success_for("a", ms(1000));
        let b = store.success_for("b", ms(5000));
        store.success_for("c", ms(2000));
        store.success_for("d", ms(4000));

        store.dismiss(b);
        assert_eq!(messages(&store.snapshot()), vec!["a", "c", "d"]);

        tokio::time::sleep(ms(1500)).await;
        assert_eq!(messages(&store.snapshot()), vec!["c", "d"]);

        tokio::time::sleep(ms(1000)).await;
        assert_eq!(messages(&store.snapshot()), vec!["d"]);

        tokio::time::sleep(ms(2000)).await;
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_unknown_or_twice_is_a_no_op() {
        let store = NotificationStore::new();
        let id = store.error_for("boom", ms(100));
        let mut subscription = store.subscribe();
        assert_eq!(subscription.latest().map(|l| l.len()), Some(1));

        store.dismiss(NotificationId::from_raw(999));
        assert_eq!(store.snapshot().len(), 1);
        assert!(subscription.try_recv().is_err(), "no-op must not publish");

        store.dismiss(id);
        store.dismiss(id);
        tokio::time::sleep(ms(200)).await;

        assert!(store.snapshot().is_empty());
        assert_eq!(subscription.try_recv().unwrap(), Vec::new());
        assert!(subscription.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_all_always_empties() {
        let store = NotificationStore::new();
        store.dismiss_all();
        assert!(store.snapshot().is_empty());

        store.success("1");
        store.error("2");
        store.dismiss_all();
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_change_as_a_full_snapshot() {
        let store = NotificationStore::new();
        let mut subscription = store.subscribe();

        store.success("Message 1");
        store.error("Message 2");
        store.dismiss_all();

        let snapshots: Vec<Vec<String>> = std::iter::from_fn(|| subscription.try_recv().ok())
            .map(|list| list.into_iter().map(|n| n.message).collect())
            .collect();
        assert_eq!(
            snapshots,
            vec![
                vec![],
                vec!["Message 1".to_string()],
                vec!["Message 1".to_string(), "Message 2".to_string()],
                vec![],
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_subscriber_starts_from_current_list() {
        let store = NotificationStore::new();
        store.info("already here");

        let mut subscription = store.subscribe();
        assert_eq!(messages(&subscription.recv().await.unwrap()), vec!["already here"]);
    }

    #[test]
    fn show_without_runtime_keeps_the_notification() {
        let store = NotificationStore::new();
        store.success("no timer");
        assert_eq!(store.snapshot().len(), 1);
    }
}
