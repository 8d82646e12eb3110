//! `finprod-client`
//!
//! **Responsibility:** terminal client for the financial products catalogue.
//!
//! This crate provides:
//! - An HTTP access wrapper with a single normalized error type
//! - The product service (list/get/create/update/delete/verify id)
//! - A notification store with timed auto-dismissal
//! - Headless list and form views plus the small components they drive
//! - Routing, the `App` composition root and the line-oriented shell
//!
//! The backend REST API stays the authority; nothing is cached or persisted.

pub mod app;
pub mod config;
pub mod http;
pub mod notification;
pub mod render;
pub mod router;
pub mod scope;
pub mod service;
pub mod shell;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{ActiveView, App};
pub use config::{ClientConfig, ConfigError};
pub use http::{ApiError, HttpClient};
pub use notification::{Notification, NotificationKind, NotificationOptions, NotificationStore};
pub use router::{Navigator, Route};
pub use scope::ViewScope;
pub use service::{ProductApi, ProductService};
