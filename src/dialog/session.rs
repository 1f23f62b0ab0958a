//! Per-conversation key/value store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Durable facts a conversation has learned about the user.
///
/// Values survive across turns and across dialogs. A key that was never
/// written is absent, which is distinct from a key holding an empty string;
/// steps branch on that difference (e.g. greeting a known user by name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    entries: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes a key, returning the previous value if one was set.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}
