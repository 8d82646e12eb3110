//! In-memory fan-out bus.

use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedSender};

use crate::bus::{EventBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

#[derive(Debug)]
struct Inner<M> {
    subscribers: Vec<UnboundedSender<M>>,
    latest: Option<M>,
}

/// In-memory pub/sub bus.
///
/// - No IO, publish never blocks
/// - Exactly-once, in-order delivery per live subscriber
/// - Optionally replays the latest message to new subscribers, so an observer
///   that joins late still starts from the current state
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    inner: Mutex<Inner<M>>,
    replay_latest: bool,
}

impl<M> InMemoryEventBus<M> {
    /// A plain bus: subscribers only see messages published after they joined.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                subscribers: Vec::new(),
                latest: None,
            }),
            replay_latest: false,
        }
    }

    /// A bus that starts from `initial` and hands the latest message to every
    /// new subscriber.
    pub fn with_latest(initial: M) -> Self {
        Self {
            inner: Mutex::new(Inner {
                subscribers: Vec::new(),
                latest: Some(initial),
            }),
            replay_latest: true,
        }
    }

    /// Number of subscribers still attached after the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.subscribers.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        inner.subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        tracing::trace!(subscribers = inner.subscribers.len(), "published message");

        if self.replay_latest {
            inner.latest = Some(message);
        }
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::unbounded_channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut inner) = self.inner.lock() {
            if self.replay_latest {
                if let Some(latest) = inner.latest.clone() {
                    let _ = tx.send(latest);
                }
            }
            inner.subscribers.push(tx);
        }

        Subscription::new(rx)
    }
}
