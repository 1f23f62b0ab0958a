//! Waterfall dialog engine
//!
//! A dialog is an ordered list of steps. Running a turn walks the step list,
//! pausing when a step prompts the user and resuming on the next message.
//! Dialogs nest: a step can push a child dialog, and the child's end result
//! is handed to the parent's next step.

mod engine;
mod session;
mod sink;
mod state;
mod step;

#[cfg(test)]
mod proptests;

pub use engine::{begin, resume, FAILURE_REPLY, MAX_DIALOG_DEPTH};
pub use session::Session;
pub use sink::ResponseSink;
pub use state::{DialogState, Frame};
pub use step::{DialogDefinition, StepError, StepOutcome};
