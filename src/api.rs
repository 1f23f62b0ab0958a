//! HTTP API for the dialog service

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::recognizer::Recognizer;
use crate::router::DialogRegistry;
use crate::runtime::RuntimeManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(
        db: Database,
        registry: Arc<DialogRegistry>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(db, registry, recognizer)),
        }
    }
}
