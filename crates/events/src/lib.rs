//! In-process publish/subscribe.
//!
//! Used to broadcast state snapshots (notifications, route changes) from a
//! single owner to any number of observers.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
