//! Serializable dialog execution state
//!
//! The stack of suspended frames is written to storage after every turn, so
//! a conversation waiting on a prompt picks up where it left off even across
//! a process restart.

use serde::{Deserialize, Serialize};

/// One entry on the dialog stack: which dialog is running and which step
/// runs next when the conversation resumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub dialog: String,
    pub step: usize,
}

impl Frame {
    pub fn new(dialog: impl Into<String>) -> Self {
        Self {
            dialog: dialog.into(),
            step: 0,
        }
    }
}

/// Where a conversation stands between turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
#[derive(Default)]
pub enum DialogState {
    /// No dialog in progress, the next message starts a fresh one
    #[default]
    Idle,

    /// A dialog prompted the user and is waiting for the answer
    Suspended { stack: Vec<Frame> },
}

impl DialogState {
    pub fn is_suspended(&self) -> bool {
        matches!(self, DialogState::Suspended { .. })
    }

    /// Name of the dialog whose step runs next, if any.
    #[allow(dead_code)] // Used in tests
    pub fn active_dialog(&self) -> Option<&str> {
        match self {
            DialogState::Idle => None,
            DialogState::Suspended { stack } => stack.last().map(|frame| frame.dialog.as_str()),
        }
    }
}
