//! Server configuration.
//!
//! All process-wide settings live in one struct, constructed once at
//! startup and injected into the registry and server. No ambient globals.

use std::path::PathBuf;

/// Default listen address when none is configured.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:38083";

/// Configuration for the status board server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Master token required by every mutating request.
    pub master_token: String,

    /// Durable snapshot location; `None` disables persistence.
    pub snapshot_path: Option<PathBuf>,

    /// Address the HTTP server binds to.
    pub listen_addr: String,
}

impl ServerConfig {
    /// Creates a config listening on the default address with persistence
    /// disabled.
    pub fn new(master_token: impl Into<String>) -> Self {
        Self {
            master_token: master_token.into(),
            snapshot_path: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }

    /// Builder-style method to set the snapshot path.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Builder-style method to set the listen address.
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new("secret123");
        assert_eq!(config.master_token, "secret123");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::new("t")
            .with_snapshot_path("/var/lib/livestat/snapshot.json")
            .with_listen_addr("127.0.0.1:0");

        assert_eq!(
            config.snapshot_path.as_deref(),
            Some(std::path::Path::new("/var/lib/livestat/snapshot.json"))
        );
        assert_eq!(config.listen_addr, "127.0.0.1:0");
    }
}
