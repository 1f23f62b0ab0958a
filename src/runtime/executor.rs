//! Per-conversation turn loop
//!
//! Each conversation gets one `ConversationRuntime` task. It loads the
//! persisted state once, then handles queued messages one at a time: score
//! intents, pick a dialog (fresh trigger, suspended stack, or fallback), run
//! the engine, persist, reply.

use crate::db::{ConversationState, Direction};
use crate::dialog::{self, DialogState, ResponseSink};
use crate::recognizer::{top_intent, Recognizer};
use crate::router::DialogRegistry;
use crate::runtime::traits::Storage;
use crate::runtime::InboundMessage;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct ConversationRuntime<S: Storage, R: Recognizer> {
    conv_key: String,
    registry: Arc<DialogRegistry>,
    recognizer: R,
    storage: S,
    message_rx: mpsc::Receiver<InboundMessage>,
}

impl<S: Storage, R: Recognizer> ConversationRuntime<S, R> {
    pub fn new(
        conv_key: String,
        registry: Arc<DialogRegistry>,
        recognizer: R,
        storage: S,
        message_rx: mpsc::Receiver<InboundMessage>,
    ) -> Self {
        Self {
            conv_key,
            registry,
            recognizer,
            storage,
            message_rx,
        }
    }

    /// Main loop: runs until every handle to this conversation is dropped
    pub async fn run(mut self) {
        let mut state = self.load_initial_state().await;

        while let Some(message) = self.message_rx.recv().await {
            let result = self.handle_message(&mut state, &message.text).await;
            if let Err(error) = &result {
                tracing::error!(conv_key = %self.conv_key, error = %error, "Turn failed");
            }
            let _ = message.reply_tx.send(result);
        }
    }

    /// Pick up whatever the last turn left behind. A conversation suspended
    /// mid-prompt resumes there, even across a process restart.
    async fn load_initial_state(&self) -> ConversationState {
        match self.storage.load_state(&self.conv_key).await {
            Ok(Some(state)) => {
                if state.dialog.is_suspended() {
                    tracing::info!(conv_key = %self.conv_key, "Resuming conversation mid-prompt");
                }
                state
            }
            Ok(None) => ConversationState::default(),
            Err(error) => {
                tracing::error!(
                    conv_key = %self.conv_key,
                    error = %error,
                    "Failed to load conversation state, starting fresh"
                );
                ConversationState::default()
            }
        }
    }

    async fn handle_message(
        &self,
        state: &mut ConversationState,
        text: &str,
    ) -> Result<Vec<String>, String> {
        let scores = match self.recognizer.recognize(text).await {
            Ok(scores) => scores,
            Err(error) => {
                tracing::warn!(
                    conv_key = %self.conv_key,
                    error = %error,
                    "Intent recognition failed, continuing without intents"
                );
                Vec::new()
            }
        };
        let intent = top_intent(&scores).map(|winner| winner.intent.clone());

        let mut sink = ResponseSink::new();
        let next = if let Some(name) = self.registry.route(intent.as_deref(), text) {
            // A fresh trigger always wins; whatever was suspended is dropped.
            dialog::begin(&self.registry, name, &mut state.session, &mut sink)
        } else {
            match std::mem::take(&mut state.dialog) {
                DialogState::Suspended { stack } => dialog::resume(
                    &self.registry,
                    stack,
                    text.to_string(),
                    &mut state.session,
                    &mut sink,
                ),
                DialogState::Idle => dialog::begin(
                    &self.registry,
                    self.registry.fallback(),
                    &mut state.session,
                    &mut sink,
                ),
            }
        };
        state.dialog = next;

        self.storage.save_state(&self.conv_key, state).await?;
        self.storage
            .add_message(&self.conv_key, Direction::Inbound, text, intent.as_deref())
            .await?;
        for reply in sink.messages() {
            self.storage
                .add_message(&self.conv_key, Direction::Outbound, reply, None)
                .await?;
        }

        tracing::debug!(
            conv_key = %self.conv_key,
            replies = sink.len(),
            suspended = state.dialog.is_suspended(),
            "Turn settled"
        );
        Ok(sink.into_messages())
    }
}
