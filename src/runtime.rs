//! Runtime for executing conversations
//!
//! One background task per active conversation. Messages are queued through
//! a mailbox channel and handled strictly in arrival order, so two turns of
//! the same conversation can never interleave.

mod executor;
pub mod traits;


pub use executor::ConversationRuntime;
pub use traits::*;

use crate::db::Database;
use crate::recognizer::Recognizer;
use crate::router::DialogRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = ConversationRuntime<DatabaseStorage, Arc<dyn Recognizer>>;

/// One queued inbound message plus the channel its replies go back on
pub struct InboundMessage {
    pub text: String,
    pub reply_tx: oneshot::Sender<Result<Vec<String>, String>>,
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    message_tx: mpsc::Sender<InboundMessage>,
}

impl ConversationHandle {
    /// Queue a message and wait for the turn's replies
    pub async fn send_text(&self, text: impl Into<String>) -> Result<Vec<String>, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.message_tx
            .send(InboundMessage {
                text: text.into(),
                reply_tx,
            })
            .await
            .map_err(|_| "Conversation runtime is gone".to_string())?;
        reply_rx
            .await
            .map_err(|_| "Conversation runtime dropped the reply".to_string())?
    }
}

/// Manager for all conversation runtimes
pub struct RuntimeManager {
    db: Database,
    registry: Arc<DialogRegistry>,
    recognizer: Arc<dyn Recognizer>,
    runtimes: RwLock<HashMap<String, ConversationHandle>>,
}

impl RuntimeManager {
    pub fn new(
        db: Database,
        registry: Arc<DialogRegistry>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            db,
            registry,
            recognizer,
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Get the database handle
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Deliver one message to its conversation and wait for the replies
    pub async fn send_message(
        &self,
        conversation_key: &str,
        text: &str,
    ) -> Result<Vec<String>, String> {
        let handle = self.get_or_create(conversation_key).await;
        handle.send_text(text).await
    }

    async fn get_or_create(&self, conversation_key: &str) -> ConversationHandle {
        // Check if already running
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(conversation_key) {
                return handle.clone();
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another task may have won the race between the read check and here
        if let Some(handle) = runtimes.get(conversation_key) {
            return handle.clone();
        }

        let (message_tx, message_rx) = mpsc::channel(32);
        let runtime: ProductionRuntime = ConversationRuntime::new(
            conversation_key.to_string(),
            self.registry.clone(),
            self.recognizer.clone(),
            DatabaseStorage::new(self.db.clone()),
            message_rx,
        );

        // Start runtime in background
        let conv_key = conversation_key.to_string();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(conv_key = %conv_key, "Conversation runtime finished");
        });

        let handle = ConversationHandle { message_tx };
        runtimes.insert(conversation_key.to_string(), handle.clone());
        handle
    }
}
