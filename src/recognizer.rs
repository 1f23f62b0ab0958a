//! Intent recognition
//!
//! Turns raw message text into scored intent labels. The production
//! recognizer calls an external HTTP endpoint; deployments without one fall
//! back to [`NullRecognizer`] and run on pattern triggers alone.

mod http;

pub use http::HttpRecognizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Lowest score a recognized intent needs before routing will consider it.
pub const INTENT_THRESHOLD: f64 = 0.1;

/// Label recognizers use for "no intent matched"; never routed.
pub const NONE_INTENT: &str = "None";

/// One candidate intent with the recognizer's confidence in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    pub score: f64,
}

/// Picks the intent routing should act on: the highest-scoring candidate
/// that clears the threshold and is not the explicit none label.
pub fn top_intent(scores: &[IntentScore]) -> Option<&IntentScore> {
    scores
        .iter()
        .filter(|candidate| candidate.score >= INTENT_THRESHOLD && candidate.intent != NONE_INTENT)
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Recognizer endpoint returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Malformed recognizer response: {0}")]
    Malformed(String),
}

/// Common interface for intent recognizers
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Score the intents a message might carry
    async fn recognize(&self, text: &str) -> Result<Vec<IntentScore>, RecognizerError>;
}

#[async_trait]
impl<T: Recognizer + ?Sized> Recognizer for Arc<T> {
    async fn recognize(&self, text: &str) -> Result<Vec<IntentScore>, RecognizerError> {
        (**self).recognize(text).await
    }
}

/// Recognizer for deployments without an endpoint: sees no intents, so only
/// pattern triggers and the fallback dialog ever fire.
pub struct NullRecognizer;

#[async_trait]
impl Recognizer for NullRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<IntentScore>, RecognizerError> {
        Ok(Vec::new())
    }
}

/// Recognizer settings read from the environment.
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    pub endpoint_url: Option<String>,
}

impl RecognizerConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint_url: std::env::var("RECOGNIZER_URL").ok(),
        }
    }

    pub fn build(&self) -> Arc<dyn Recognizer> {
        match &self.endpoint_url {
            Some(url) => Arc::new(HttpRecognizer::new(url.clone())),
            None => Arc::new(NullRecognizer),
        }
    }
}
