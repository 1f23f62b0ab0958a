//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::db::{ConversationState, Database, Direction, TranscriptEntry};
use async_trait::async_trait;
use std::sync::Arc;

/// Storage for conversation state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state saved for a conversation, if any was ever written
    async fn load_state(&self, conv_key: &str) -> Result<Option<ConversationState>, String>;

    /// Replace the state saved for a conversation
    async fn save_state(&self, conv_key: &str, state: &ConversationState) -> Result<(), String>;
}

/// Storage for conversation transcripts
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append a message to the transcript
    async fn add_message(
        &self,
        conv_key: &str,
        direction: Direction,
        body: &str,
        intent: Option<&str>,
    ) -> Result<TranscriptEntry, String>;

    /// Get the transcript in send order
    #[allow(dead_code)] // API completeness
    async fn get_messages(&self, conv_key: &str) -> Result<Vec<TranscriptEntry>, String>;
}

/// Combined storage trait for convenience
pub trait Storage: StateStore + TranscriptStore {}
impl<T: StateStore + TranscriptStore> Storage for T {}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn load_state(&self, conv_key: &str) -> Result<Option<ConversationState>, String> {
        (**self).load_state(conv_key).await
    }

    async fn save_state(&self, conv_key: &str, state: &ConversationState) -> Result<(), String> {
        (**self).save_state(conv_key, state).await
    }
}

#[async_trait]
impl<T: TranscriptStore + ?Sized> TranscriptStore for Arc<T> {
    async fn add_message(
        &self,
        conv_key: &str,
        direction: Direction,
        body: &str,
        intent: Option<&str>,
    ) -> Result<TranscriptEntry, String> {
        (**self).add_message(conv_key, direction, body, intent).await
    }

    async fn get_messages(&self, conv_key: &str) -> Result<Vec<TranscriptEntry>, String> {
        (**self).get_messages(conv_key).await
    }
}

/// Adapter to use Database as Storage
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StateStore for DatabaseStorage {
    async fn load_state(&self, conv_key: &str) -> Result<Option<ConversationState>, String> {
        self.db
            .load_conversation_state(conv_key)
            .map_err(|e| e.to_string())
    }

    async fn save_state(&self, conv_key: &str, state: &ConversationState) -> Result<(), String> {
        self.db
            .save_conversation_state(conv_key, state)
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl TranscriptStore for DatabaseStorage {
    async fn add_message(
        &self,
        conv_key: &str,
        direction: Direction,
        body: &str,
        intent: Option<&str>,
    ) -> Result<TranscriptEntry, String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.db
            .add_message(&id, conv_key, direction, body, intent)
            .map_err(|e| e.to_string())
    }

    async fn get_messages(&self, conv_key: &str) -> Result<Vec<TranscriptEntry>, String> {
        self.db.get_messages(conv_key).map_err(|e| e.to_string())
    }
}
