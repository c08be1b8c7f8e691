//! Error types for the livestat status board.

use crate::types::ServiceId;
use thiserror::Error;

/// Result type alias for livestat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for livestat operations.
///
/// The first five variants map directly to client-visible HTTP statuses.
/// `Persistence` and `Io` stay internal: snapshot load/persist failures are
/// logged and never surfaced to the client that triggered them.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing token on a mutating call. Carries no service ID so a
    /// rejected caller learns nothing about registry contents.
    #[error("Invalid token")]
    Unauthorized,

    /// Create on an ID that is already registered.
    #[error("Service already exists: {id}")]
    AlreadyExists { id: ServiceId },

    /// Update or delete on an ID that is not registered.
    #[error("Service does not exist: {id}")]
    NotFound { id: ServiceId },

    /// Malformed service ID on a mutating call.
    #[error("Invalid service id: {id:?}")]
    InvalidId { id: String },

    /// Unrecognized render format.
    #[error("Invalid format: {format:?}")]
    InvalidFormat { format: String },

    /// Snapshot could not be serialized or parsed.
    #[error("Snapshot persistence failed: {reason}")]
    Persistence { reason: String },

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an AlreadyExists error.
    pub fn already_exists(id: impl Into<ServiceId>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    /// Creates a NotFound error.
    pub fn not_found(id: impl Into<ServiceId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates an InvalidId error.
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(format: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.into(),
        }
    }

    /// Creates a Persistence error.
    pub fn persistence(reason: impl Into<String>) -> Self {
        Self::Persistence {
            reason: reason.into(),
        }
    }
}
