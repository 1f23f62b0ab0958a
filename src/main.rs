//! Banter - a waterfall dialog bot service
//!
//! A Rust backend implementing multi-step conversational dialogs with
//! durable suspension behind a message webhook.

mod api;
mod db;
mod dialog;
mod recognizer;
mod router;
mod runtime;
mod scripts;

use api::{create_router, AppState};
use db::Database;
use recognizer::RecognizerConfig;
use scripts::default_registry;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("BANTER_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.banter/banter.db")
    });

    let port: u16 = std::env::var("BANTER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3978);

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    // Intent recognizer
    let recognizer_config = RecognizerConfig::from_env();
    if let Some(url) = &recognizer_config.endpoint_url {
        tracing::info!(endpoint = %url, "Intent recognizer configured");
    } else {
        tracing::warn!(
            "RECOGNIZER_URL not set. Routing on pattern triggers and the fallback dialog only."
        );
    }
    let recognizer = recognizer_config.build();

    // Create application state
    let state = AppState::new(db, Arc::new(default_registry()), recognizer);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Banter server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
