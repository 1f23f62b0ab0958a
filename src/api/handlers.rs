//! HTTP request handlers

use super::types::{
    ConversationDetailResponse, ErrorResponse, SendMessageRequest, SendMessageResponse,
};
use super::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Webhook: one inbound message in, that turn's replies out
        .route("/api/messages", post(send_message))
        // Conversation inspection
        .route("/api/conversations/:key", get(get_conversation))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    if req.conversation_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "conversation_id must not be empty".to_string(),
        ));
    }

    let replies = state
        .runtime
        .send_message(&req.conversation_id, &req.text)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(SendMessageResponse { replies }))
}

// ============================================================
// Conversation Inspection
// ============================================================

async fn get_conversation(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ConversationDetailResponse>, AppError> {
    let conversation = state
        .runtime
        .db()
        .get_conversation(&key)
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    let messages = state
        .runtime
        .db()
        .get_messages(&key)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let json_msgs: Vec<Value> = messages
        .iter()
        .map(|m| serde_json::to_value(m).unwrap_or(Value::Null))
        .collect();

    Ok(Json(ConversationDetailResponse {
        conversation: serde_json::to_value(&conversation).unwrap_or(Value::Null),
        messages: json_msgs,
    }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("banter ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
