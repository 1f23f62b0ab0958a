//! Dialog definitions and step outcomes

use crate::dialog::session::Session;
use crate::dialog::sink::ResponseSink;
use std::fmt;
use thiserror::Error;

/// What a step tells the engine to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fall through to the next step, optionally carrying a value as its input
    Continue(Option<String>),
    /// Send a question and suspend until the user answers; the answer becomes
    /// the next step's input
    Prompt(String),
    /// Push the named child dialog; its end result becomes the next step's input
    BeginChild(String),
    /// Send a final message and finish this dialog, handing the message to the
    /// parent's next step
    End(String),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("step failed: {0}")]
    Failed(String),
    #[error("unknown dialog: {0}")]
    UnknownDialog(String),
    #[error("dialog nesting exceeds depth limit of {0}")]
    TooDeep(usize),
}

impl StepError {
    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed(message.into())
    }
}

type StepFn =
    dyn Fn(&mut Session, Option<String>, &mut ResponseSink) -> Result<StepOutcome, StepError>
        + Send
        + Sync;

/// A named waterfall: an ordered list of steps executed top to bottom.
///
/// Steps receive the session, the input carried from the previous step (the
/// user's answer after a prompt, or a child dialog's result), and a sink for
/// sending messages mid-step.
pub struct DialogDefinition {
    name: String,
    steps: Vec<Box<StepFn>>,
}

impl DialogDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step. Steps run in the order they were added.
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: Fn(&mut Session, Option<String>, &mut ResponseSink) -> Result<StepOutcome, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn run_step(
        &self,
        index: usize,
        session: &mut Session,
        input: Option<String>,
        sink: &mut ResponseSink,
    ) -> Result<StepOutcome, StepError> {
        let step = self
            .steps
            .get(index)
            .ok_or_else(|| StepError::failed(format!("dialog {} has no step {index}", self.name)))?;
        step(session, input, sink)
    }
}

impl fmt::Debug for DialogDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogDefinition")
            .field("name", &self.name)
            .field("steps", &self.steps.len())
            .finish()
    }
}
