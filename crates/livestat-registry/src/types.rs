//! Data types for the service registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status record for one registered service.
///
/// The service ID lives in the registry map key (and in the persisted
/// snapshot's object key), not in the record body. The status payload is an
/// arbitrary string, opaque to the system: no schema, no validation, no
/// trimming.
///
/// Serialized form (also the persisted format):
/// `{"status": "...", "lastUpdated": "<RFC 3339 UTC>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Last pushed status payload. Empty until the first update.
    pub status: String,

    /// When this record was created or last mutated. Monotonically
    /// non-decreasing across the record's lifetime.
    pub last_updated: DateTime<Utc>,
}

impl ServiceRecord {
    /// Creates a fresh record with an empty status, stamped now.
    pub fn new() -> Self {
        Self {
            status: String::new(),
            last_updated: Utc::now(),
        }
    }

    /// Replaces the status verbatim and refreshes the timestamp.
    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.last_updated = Utc::now();
    }
}

impl Default for ServiceRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
