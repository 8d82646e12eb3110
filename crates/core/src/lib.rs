//! `finprod-core`: shared building blocks for the product catalogue client.
//!
//! This crate contains **pure** primitives (no IO, no async, no HTTP).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{NotificationId, ProductId};
