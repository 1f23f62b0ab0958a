//! Database module for the bot
//!
//! Persists conversation state (session plus dialog stack) and the message
//! transcript. State is written after every turn, so a process restart picks
//! conversations back up mid-prompt.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Conversation Operations ====================

    /// Write a conversation's state, creating the row on first contact
    pub fn save_conversation_state(&self, key: &str, state: &ConversationState) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let session = serde_json::to_string(&state.session).unwrap();
        let dialog = serde_json::to_string(&state.dialog).unwrap();

        conn.execute(
            "INSERT INTO conversations (key, session, dialog_state, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(key) DO UPDATE SET session = ?2, dialog_state = ?3, updated_at = ?4",
            params![key, session, dialog, now],
        )?;

        Ok(())
    }

    /// Load a conversation's state; `None` for a key never seen before
    pub fn load_conversation_state(&self, key: &str) -> DbResult<Option<ConversationState>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT session, dialog_state FROM conversations WHERE key = ?1",
            params![key],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );

        match result {
            Ok((session, dialog)) => Ok(Some(ConversationState {
                session: serde_json::from_str(&session).unwrap_or_default(),
                dialog: serde_json::from_str(&dialog).unwrap_or_default(),
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get conversation by key
    pub fn get_conversation(&self, key: &str) -> DbResult<Conversation> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT key, session, dialog_state, created_at, updated_at
             FROM conversations WHERE key = ?1",
        )?;

        stmt.query_row(params![key], |row| {
            let session: String = row.get(1)?;
            let dialog: String = row.get(2)?;
            Ok(Conversation {
                key: row.get(0)?,
                session: serde_json::from_str(&session).unwrap_or_default(),
                dialog: serde_json::from_str(&dialog).unwrap_or_default(),
                created_at: parse_datetime(&row.get::<_, String>(3)?),
                updated_at: parse_datetime(&row.get::<_, String>(4)?),
            })
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::ConversationNotFound(key.to_string()),
            other => DbError::Sqlite(other),
        })
    }

    // ==================== Transcript Operations ====================

    /// Append a message to a conversation's transcript
    pub fn add_message(
        &self,
        id: &str,
        conversation_key: &str,
        direction: Direction,
        body: &str,
        intent: Option<&str>,
    ) -> DbResult<TranscriptEntry> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        // Get next sequence ID
        let sequence_id: i64 = conn.query_row(
            "SELECT COALESCE(MAX(sequence_id), 0) + 1 FROM messages WHERE conversation_key = ?1",
            params![conversation_key],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO messages (id, conversation_key, sequence_id, direction, body, intent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                conversation_key,
                sequence_id,
                direction.to_string(),
                body,
                intent,
                now.to_rfc3339(),
            ],
        )?;

        // Update conversation timestamp
        conn.execute(
            "UPDATE conversations SET updated_at = ?1 WHERE key = ?2",
            params![now.to_rfc3339(), conversation_key],
        )?;

        Ok(TranscriptEntry {
            id: id.to_string(),
            conversation_key: conversation_key.to_string(),
            sequence_id,
            direction,
            body: body.to_string(),
            intent: intent.map(String::from),
            created_at: now,
        })
    }

    /// Get a conversation's transcript in send order
    pub fn get_messages(&self, conversation_key: &str) -> DbResult<Vec<TranscriptEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, conversation_key, sequence_id, direction, body, intent, created_at
             FROM messages WHERE conversation_key = ?1 ORDER BY sequence_id ASC",
        )?;

        let rows = stmt.query_map(params![conversation_key], parse_transcript_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn parse_transcript_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TranscriptEntry> {
    let direction: String = row.get(3)?;
    Ok(TranscriptEntry {
        id: row.get(0)?,
        conversation_key: row.get(1)?,
        sequence_id: row.get(2)?,
        direction: parse_direction(&direction),
        body: row.get(4)?,
        intent: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn parse_direction(s: &str) -> Direction {
    match s {
        "outbound" => Direction::Outbound,
        _ => Direction::Inbound,
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
