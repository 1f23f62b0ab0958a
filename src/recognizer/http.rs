//! HTTP intent recognizer
//!
//! Speaks the LUIS-style query protocol: GET the endpoint with the message
//! text in the `q` parameter, get back scored intents as JSON. Endpoints
//! report either a full `intents` array or just a `topScoringIntent`.

use crate::recognizer::{IntentScore, Recognizer, RecognizerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub struct HttpRecognizer {
    client: Client,
    endpoint_url: String,
}

impl HttpRecognizer {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint_url: endpoint_url.into(),
        }
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<IntentScore>, RecognizerError> {
        let response = self
            .client
            .get(&self.endpoint_url)
            .query(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecognizerError::Network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    RecognizerError::Network(format!("Connection failed: {e}"))
                } else {
                    RecognizerError::Network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecognizerError::Network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(RecognizerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| RecognizerError::Malformed(format!("Failed to parse response: {e}")))?;
        Ok(parsed.into_scores())
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "topScoringIntent")]
    top_scoring_intent: Option<RawIntent>,
    #[serde(default)]
    intents: Vec<RawIntent>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: String,
    #[serde(default)]
    score: f64,
}

impl QueryResponse {
    fn into_scores(self) -> Vec<IntentScore> {
        let raw = if self.intents.is_empty() {
            self.top_scoring_intent.into_iter().collect()
        } else {
            self.intents
        };
        raw.into_iter()
            .map(|candidate| IntentScore {
                intent: candidate.intent,
                score: candidate.score,
            })
            .collect()
    }
}
