//! Core domain types for the livestat status board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service identifier - the sole identity key for a registered service.
///
/// Assigned at creation and immutable thereafter. Used as the registry map
/// key and as the key of the persisted snapshot object; it is never stored
/// redundantly inside the record body.
///
/// # Example
/// ```
/// use livestat_common::ServiceId;
///
/// let id = ServiceId::from("web1");
/// assert_eq!(id.as_str(), "web1");
/// assert!(id.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a new ServiceId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the service ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this ID is acceptable for mutating operations.
    ///
    /// A valid ID is non-empty and contains only ASCII alphanumerics,
    /// hyphens, underscores, and dots. Read-side lookups skip this check:
    /// an invalid ID simply matches nothing.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
