//! The bot's dialog set
//!
//! Builds the registry every conversation runs against: a greeter that
//! learns the user's name, a help dialog that leans on the greeter, a joke
//! dialog, a reset dialog, and the fallback for anything unrecognized.

use crate::dialog::{DialogDefinition, StepOutcome};
use crate::router::{DialogRegistry, Trigger};
use rand::seq::SliceRandom;
use regex::Regex;

/// Session key holding the user's name once the greeter has asked for it.
pub const USERNAME_KEY: &str = "username";

pub const HELP_MESSAGE: &str = "Try asking me things like tell me a joke";

pub const NAME_PROMPT: &str = "Before get started, can you please tell me your name?";

pub const RESET_CONFIRMATION: &str = "Oops... I'm suffering from a memory loss...";

pub const DEFAULT_REPLY: &str = "Sorry, I didn't understand. Type help if you need assistance.";

/// Question/punchline pairs for the joke dialog.
pub const JOKES: [(&str, &str); 4] = [
    (
        "What do you get when you cross a snowman and a vampire?",
        "Frostbite!",
    ),
    ("What do elves learn in school?", "The elf-abet"),
    (
        "Why are seagulls called seagulls?",
        "Because if they flew over the bay, they would be bagels!",
    ),
    (
        "How do you make a tissue dance?",
        "You put a little boogie in it",
    ),
];

/// Builds the full dialog registry with all triggers wired.
pub fn default_registry() -> DialogRegistry {
    let mut registry = DialogRegistry::new("default");
    registry.register(greet_dialog(), vec![]);
    registry.register(help_dialog(), vec![Trigger::intent("help")]);
    registry.register(joke_dialog(), vec![Trigger::intent("joke")]);
    registry.register(
        reset_dialog(),
        vec![Trigger::Pattern(
            Regex::new(r"(?i)^reset").expect("reset trigger pattern compiles"),
        )],
    );
    registry.register(default_dialog(), vec![]);
    registry
}

/// Greets a known user by name, or asks for the name first and remembers it.
fn greet_dialog() -> DialogDefinition {
    DialogDefinition::new("greet")
        .step(|session, _input, _sink| match session.get(USERNAME_KEY) {
            Some(name) => Ok(StepOutcome::Continue(Some(name.to_string()))),
            None => Ok(StepOutcome::Prompt(NAME_PROMPT.to_string())),
        })
        .step(|session, input, _sink| {
            let name = input.unwrap_or_default();
            session.set(USERNAME_KEY, name.clone());
            Ok(StepOutcome::End(format!("Hi, {name}")))
        })
}

/// Greets first, then points at what the bot can do.
fn help_dialog() -> DialogDefinition {
    DialogDefinition::new("help")
        .step(|_session, _input, _sink| Ok(StepOutcome::BeginChild("greet".to_string())))
        .step(|_session, _input, _sink| {
            Ok(StepOutcome::End(format!("You need help? {HELP_MESSAGE}")))
        })
}

/// Sends a random setup line, then lands the punchline.
fn joke_dialog() -> DialogDefinition {
    DialogDefinition::new("joke").step(|_session, _input, sink| {
        let mut rng = rand::thread_rng();
        let &(question, answer) = JOKES.choose(&mut rng).unwrap_or(&JOKES[0]);
        sink.send(question);
        Ok(StepOutcome::End(answer.to_string()))
    })
}

/// Forgets everything the bot knows about the user.
fn reset_dialog() -> DialogDefinition {
    DialogDefinition::new("reset").step(|session, _input, _sink| {
        session.remove(USERNAME_KEY);
        Ok(StepOutcome::End(RESET_CONFIRMATION.to_string()))
    })
}

fn default_dialog() -> DialogDefinition {
    DialogDefinition::new("default")
        .step(|_session, _input, _sink| Ok(StepOutcome::End(DEFAULT_REPLY.to_string())))
}
