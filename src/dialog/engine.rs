//! Step execution loop
//!
//! Runs one turn of a conversation: walks the dialog stack, executing steps
//! until every dialog has finished (back to idle) or a step prompts the user
//! (suspended). Any step failure drops the whole stack and apologizes, so a
//! broken dialog never wedges the conversation.

use crate::dialog::session::Session;
use crate::dialog::sink::ResponseSink;
use crate::dialog::state::{DialogState, Frame};
use crate::dialog::step::{StepError, StepOutcome};
use crate::router::DialogRegistry;

/// Most deeply nested dialogs a single stack may hold. A step that tries to
/// push past this is treated as failed, which catches dialogs that begin
/// themselves in a cycle.
pub const MAX_DIALOG_DEPTH: usize = 8;

/// Sent in place of a normal reply when a turn is abandoned.
pub const FAILURE_REPLY: &str = "Sorry, something went wrong on my end. Let's start over.";

/// Starts the named dialog at its first step and runs until the turn settles.
pub fn begin(
    registry: &DialogRegistry,
    dialog: &str,
    session: &mut Session,
    sink: &mut ResponseSink,
) -> DialogState {
    run(registry, vec![Frame::new(dialog)], None, session, sink)
}

/// Resumes a suspended stack with the user's answer. The answer feeds the
/// step after the one that prompted; the prompting step does not run again.
pub fn resume(
    registry: &DialogRegistry,
    stack: Vec<Frame>,
    input: String,
    session: &mut Session,
    sink: &mut ResponseSink,
) -> DialogState {
    run(registry, stack, Some(input), session, sink)
}

fn run(
    registry: &DialogRegistry,
    mut stack: Vec<Frame>,
    mut input: Option<String>,
    session: &mut Session,
    sink: &mut ResponseSink,
) -> DialogState {
    loop {
        let Some(frame) = stack.last_mut() else {
            return DialogState::Idle;
        };
        let Some(dialog) = registry.get(&frame.dialog) else {
            let error = StepError::UnknownDialog(frame.dialog.clone());
            return abandon(sink, &frame.dialog, &error);
        };

        if frame.step >= dialog.step_count() {
            // Walked past the last step: the dialog is complete and the
            // carried value becomes its parent's input.
            stack.pop();
            continue;
        }

        let index = frame.step;
        frame.step = index + 1;

        match dialog.run_step(index, session, input.take(), sink) {
            Ok(StepOutcome::Continue(value)) => {
                input = value;
            }
            Ok(StepOutcome::Prompt(question)) => {
                sink.send(question);
                return DialogState::Suspended { stack };
            }
            Ok(StepOutcome::BeginChild(child)) => {
                if stack.len() >= MAX_DIALOG_DEPTH {
                    let error = StepError::TooDeep(MAX_DIALOG_DEPTH);
                    return abandon(sink, &child, &error);
                }
                stack.push(Frame::new(child));
            }
            Ok(StepOutcome::End(result)) => {
                sink.send(result.clone());
                stack.pop();
                input = Some(result);
            }
            Err(error) => {
                return abandon(sink, dialog.name(), &error);
            }
        }
    }
}

/// Drops whatever was in progress. Session writes made before the failure
/// stay; only the dialog stack is lost.
fn abandon(sink: &mut ResponseSink, dialog: &str, error: &StepError) -> DialogState {
    tracing::warn!(dialog = %dialog, error = %error, "Dialog failed, abandoning stack");
    sink.send(FAILURE_REPLY);
    DialogState::Idle
}
