//! `[collab]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [collab]
//! collaborator = "alice"        # Local collaborator id (random when absent)
//! quiesce_ms = 100              # Echo-suppression window after a remote change
//! broadcast_debounce_ms = 500   # Outbound coalescing window per file
//! heartbeat_secs = 30           # Presence heartbeat period
//! presence_window_secs = 300    # Collaborators seen within this window are present
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collab::CollaboratorId;
use crate::config::{ConfigDiagnostics, FieldPath};

/// Collaboration timing and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollabConfig {
    /// Local collaborator identifier.
    pub collaborator: Option<String>,
    pub quiesce_ms: u64,
    pub broadcast_debounce_ms: u64,
    pub heartbeat_secs: u64,
    pub presence_window_secs: u64,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            collaborator: None,
            quiesce_ms: 100,
            broadcast_debounce_ms: 500,
            heartbeat_secs: 30,
            presence_window_secs: 300,
        }
    }
}

impl CollabConfig {
    /// Configured identity, or a fresh random one.
    pub fn collaborator_id(&self) -> CollaboratorId {
        self.collaborator
            .as_deref()
            .map_or_else(CollaboratorId::generate, CollaboratorId::from)
    }

    pub fn quiesce(&self) -> Duration {
        Duration::from_millis(self.quiesce_ms)
    }

    pub fn broadcast_debounce(&self) -> Duration {
        Duration::from_millis(self.broadcast_debounce_ms)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn presence_window(&self) -> Duration {
        Duration::from_secs(self.presence_window_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let windows = [
            ("collab.quiesce_ms", self.quiesce_ms),
            ("collab.broadcast_debounce_ms", self.broadcast_debounce_ms),
            ("collab.heartbeat_secs", self.heartbeat_secs),
            ("collab.presence_window_secs", self.presence_window_secs),
        ];
        for (field, value) in windows {
            if value == 0 {
                diag.error(FieldPath::new(field), "must be positive");
            }
        }
        if self.collaborator.as_deref().is_some_and(|c| c.trim().is_empty()) {
            diag.error(FieldPath::new("collab.collaborator"), "collaborator id is empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_collab_config() {
        let config = test_parse_config(
            "[collab]\ncollaborator = \"alice\"\nquiesce_ms = 50\nbroadcast_debounce_ms = 800",
        );
        assert_eq!(config.collab.collaborator_id().as_str(), "alice");
        assert_eq!(config.collab.quiesce().as_millis(), 50);
        assert_eq!(config.collab.broadcast_debounce().as_millis(), 800);
        assert_eq!(config.collab.heartbeat().as_secs(), 30);
    }

    #[test]
    fn test_zero_windows_rejected() {
        let config = test_parse_config("[collab]\nquiesce_ms = 0\nheartbeat_secs = 0");
        let mut diag = ConfigDiagnostics::new();
        config.collab.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_random_collaborator_when_absent() {
        let config = test_parse_config("");
        assert_ne!(config.collab.collaborator_id(), config.collab.collaborator_id());
    }
}
