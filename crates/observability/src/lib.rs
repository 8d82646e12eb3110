//! Tracing/logging setup shared by every binary of the workspace.

/// Install the process-wide log subscriber, formatted per `FINPROD_LOG_FORMAT`.
///
/// Only the first call installs anything.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber setup (filter, output format).
pub mod tracing;

pub use self::tracing::LogFormat;
