//! Messages exchanged between collaborators of one project.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::project::FileId;

/// Identifies one collaborator (one editing client).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollaboratorId(String);

impl CollaboratorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CollaboratorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// New content of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub id: FileId,
    pub content: String,
}

impl FileChange {
    pub fn new(id: FileId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Edits broadcast by one collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorChangeEvent {
    pub files: Vec<FileChange>,
    pub originator: CollaboratorId,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CollaboratorChangeEvent {
    /// Stamp an event with the current wall-clock time.
    pub fn now(originator: CollaboratorId, files: Vec<FileChange>) -> Self {
        Self {
            files,
            originator,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// "I am here, looking at this file."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceBeat {
    pub collaborator: CollaboratorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Everything that travels over a project channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ChannelMessage {
    FileChange(CollaboratorChangeEvent),
    Presence(PresenceBeat),
    /// The collaborator closed the project.
    Leave(CollaboratorId),
}

impl ChannelMessage {
    pub fn sender(&self) -> &CollaboratorId {
        match self {
            Self::FileChange(event) => &event.originator,
            Self::Presence(beat) => &beat.collaborator,
            Self::Leave(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_json() {
        let json = r#"{"files":[{"id":"f1","content":"<p>hi</p>"}],"originator":"bob","timestamp":1700000000000}"#;
        let event: CollaboratorChangeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.originator, CollaboratorId::from("bob"));
        assert_eq!(event.files[0].id, FileId::from("f1"));
        assert_eq!(event.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_channel_message_tagged() {
        let msg = ChannelMessage::Leave("alice".into());
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"event":"leave","payload":"alice"}"#);
        assert_eq!(msg.sender().as_str(), "alice");
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(CollaboratorId::generate(), CollaboratorId::generate());
    }
}
