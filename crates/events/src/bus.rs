//! Publishing/subscription abstraction (mechanics only).
//!
//! A bus fans every published message out to all live subscriptions. Each
//! subscription receives messages in publish order. Dropping a subscription
//! unsubscribes it; the bus prunes it on the next publish.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

/// A subscription to a message stream.
///
/// ```ignore
/// let mut subscription = bus.subscribe();
/// while let Some(snapshot) = subscription.recv().await {
///     render(&snapshot);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: UnboundedReceiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: UnboundedReceiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&mut self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything queued so far and keep only the most recent message.
    pub fn latest(&mut self) -> Option<M> {
        let mut last = None;
        while let Ok(message) = self.receiver.try_recv() {
            last = Some(message);
        }
        last
    }
}

/// Transport-agnostic pub/sub.
///
/// `Send + Sync` so a bus can be shared between the UI loop and timer tasks.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
