//! Maps incoming messages to dialogs
//!
//! A registry holds every dialog the bot knows plus the triggers that start
//! them. Routing order: regex triggers run against the raw text first, then
//! intent triggers against the recognized intent. A match always starts its
//! dialog fresh, even when another dialog is mid-prompt.

use crate::dialog::DialogDefinition;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Condition under which a message starts a dialog.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Fires when the recognizer's winning intent carries this label
    Intent(String),
    /// Fires when the raw message text matches, before any intent is consulted
    Pattern(Regex),
}

impl Trigger {
    pub fn intent(label: impl Into<String>) -> Self {
        Trigger::Intent(label.into())
    }
}

/// All registered dialogs and their triggers.
pub struct DialogRegistry {
    dialogs: HashMap<String, Arc<DialogDefinition>>,
    triggers: Vec<(Trigger, String)>,
    fallback: String,
}

impl DialogRegistry {
    /// Creates an empty registry. The fallback dialog handles every message
    /// no trigger claims; register it like any other dialog.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            dialogs: HashMap::new(),
            triggers: Vec::new(),
            fallback: fallback.into(),
        }
    }

    pub fn register(&mut self, dialog: DialogDefinition, triggers: Vec<Trigger>) {
        let name = dialog.name().to_string();
        for trigger in triggers {
            self.triggers.push((trigger, name.clone()));
        }
        self.dialogs.insert(name, Arc::new(dialog));
    }

    pub fn get(&self, name: &str) -> Option<Arc<DialogDefinition>> {
        self.dialogs.get(name).cloned()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Picks the dialog a message should start, if any trigger claims it.
    ///
    /// Pattern triggers win over intent triggers regardless of registration
    /// order; within a kind, first registered wins. Returns `None` when
    /// nothing matches, leaving the message to a suspended dialog or the
    /// fallback.
    pub fn route(&self, intent: Option<&str>, text: &str) -> Option<&str> {
        for (trigger, dialog) in &self.triggers {
            if let Trigger::Pattern(pattern) = trigger {
                if pattern.is_match(text) {
                    return Some(dialog);
                }
            }
        }
        let intent = intent?;
        for (trigger, dialog) in &self.triggers {
            if let Trigger::Intent(label) = trigger {
                if label == intent {
                    return Some(dialog);
                }
            }
        }
        None
    }
}
