//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a financial product.
///
/// Chosen by the user at creation time and immutable afterwards. The length
/// rule (3–10 characters) is a form rule and is enforced by validation, not
/// here: products already stored by the backend are accepted as they are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    /// Accepts any non-blank identifier that can be used as a single path segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ProductId: empty"));
        }
        if trimmed.contains('/') {
            return Err(DomainError::invalid_id(format!(
                "ProductId: '{trimmed}' contains '/'"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a notification.
///
/// Issued by a single store from a counter, so ids are unique per store and
/// ordered by generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

impl FromStr for NotificationId {
    type Err = DomainError;

    /// Parses either the bare counter (`7`) or the display form (`notification-7`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let digits = raw.strip_prefix("notification-").unwrap_or(raw);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("NotificationId: {e}")))
    }
}
