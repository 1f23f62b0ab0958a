//! Database schema and types

pub use crate::dialog::{DialogState, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    key TEXT PRIMARY KEY,
    session TEXT NOT NULL DEFAULT '{}',
    dialog_state TEXT NOT NULL DEFAULT '{"type":"idle"}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    conversation_key TEXT NOT NULL,
    sequence_id INTEGER NOT NULL,
    direction TEXT NOT NULL,
    body TEXT NOT NULL,
    intent TEXT,
    created_at TEXT NOT NULL,

    UNIQUE (conversation_key, sequence_id),
    FOREIGN KEY (conversation_key) REFERENCES conversations(key) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_key, sequence_id);
"#;

/// Everything a conversation carries between turns: the session facts and
/// the dialog stack. Loaded before a turn runs, written back after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    pub session: Session,
    pub dialog: DialogState,
}

/// Conversation record
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub key: String,
    pub session: Session,
    pub dialog: DialogState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transcript record: one message in or out of a conversation
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub conversation_key: String,
    pub sequence_id: i64,
    pub direction: Direction,
    pub body: String,
    pub intent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Which way a transcript message traveled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
        }
    }
}
