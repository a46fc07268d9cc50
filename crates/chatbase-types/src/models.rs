//! Row types as the widget reads them back from the REST API.
//! Ids and timestamps are generated by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub content: Option<String>,
    #[serde(default)]
    pub message_type: MessageType,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// File fields only carry meaning on `file` messages.
    pub fn has_attachment(&self) -> bool {
        self.message_type == MessageType::File && self.file_url.is_some()
    }
}

/// One row per user, refreshed on every heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presence {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingIndicator {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameReservation {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `usernames`. `id` is left to the column default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsername {
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
