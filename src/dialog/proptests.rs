//! Property-based tests for the dialog engine
//!
//! Drives the production dialog set through randomized turn sequences and
//! checks the invariants that keep a conversation coherent: every turn
//! replies, the stack stays bounded, answers land in the session, and the
//! persisted state round-trips through JSON unchanged.

#![allow(clippy::too_many_lines)]

use super::*;
use crate::router::DialogRegistry;
use crate::scripts::{
    default_registry, DEFAULT_REPLY, HELP_MESSAGE, JOKES, NAME_PROMPT, RESET_CONFIRMATION,
    USERNAME_KEY,
};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

/// One turn of the dispatch rule: triggers first, then the suspended stack,
/// then the fallback.
fn run_turn(
    registry: &DialogRegistry,
    session: &mut Session,
    state: DialogState,
    intent: Option<&str>,
    text: &str,
) -> (DialogState, Vec<String>) {
    let mut sink = ResponseSink::new();
    let next = if let Some(name) = registry.route(intent, text) {
        begin(registry, name, session, &mut sink)
    } else {
        match state {
            DialogState::Suspended { stack } => {
                resume(registry, stack, text.to_string(), session, &mut sink)
            }
            DialogState::Idle => begin(registry, registry.fallback(), session, &mut sink),
        }
    };
    (next, sink.into_messages())
}

fn is_joke_pair(messages: &[String]) -> bool {
    messages.len() == 2
        && JOKES
            .iter()
            .any(|&(question, answer)| question == messages[0] && answer == messages[1])
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_user_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}".prop_filter("answers starting with reset route away", |name| {
        !name.to_lowercase().starts_with("reset")
    })
}

fn arb_message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ?!.,']{1,40}"
}

fn arb_plain_message() -> impl Strategy<Value = String> {
    arb_message().prop_filter("messages starting with reset route away", |text| {
        !text.to_lowercase().starts_with("reset")
    })
}

fn arb_intent() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        2 => Just(Some("help".to_string())),
        2 => Just(Some("joke".to_string())),
        1 => Just(Some("weather".to_string())),
    ]
}

fn arb_frame() -> impl Strategy<Value = Frame> {
    ("[a-z]{1,8}", 0..5usize).prop_map(|(dialog, step)| Frame { dialog, step })
}

fn arb_dialog_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::Idle),
        proptest::collection::vec(arb_frame(), 1..4)
            .prop_map(|stack| DialogState::Suspended { stack }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: every turn produces at least one non-empty reply, the
    // stack never outgrows the depth limit, and nothing panics.
    #[test]
    fn prop_every_turn_replies(turns in proptest::collection::vec((arb_intent(), arb_message()), 1..12)) {
        let registry = default_registry();
        let mut session = Session::new();
        let mut state = DialogState::Idle;

        for (intent, text) in turns {
            let (next, replies) = run_turn(&registry, &mut session, state, intent.as_deref(), &text);
            prop_assert!(!replies.is_empty());
            prop_assert!(replies.iter().all(|reply| !reply.is_empty()));
            if let DialogState::Suspended { stack } = &next {
                prop_assert!(!stack.is_empty());
                prop_assert!(stack.len() <= MAX_DIALOG_DEPTH);
            }
            state = next;
        }
    }

    // Invariant 2: the name given at the prompt is stored verbatim and
    // echoed back in the greeting.
    #[test]
    fn prop_prompt_answer_is_remembered(name in arb_user_name()) {
        let registry = default_registry();
        let mut session = Session::new();

        let (state, replies) = run_turn(&registry, &mut session, DialogState::Idle, Some("help"), "help");
        prop_assert_eq!(replies, vec![NAME_PROMPT.to_string()]);
        prop_assert!(state.is_suspended());

        let (state, replies) = run_turn(&registry, &mut session, state, None, &name);
        prop_assert_eq!(state, DialogState::Idle);
        prop_assert_eq!(replies, vec![
            format!("Hi, {name}"),
            format!("You need help? {HELP_MESSAGE}"),
        ]);
        prop_assert_eq!(session.get(USERNAME_KEY), Some(name.as_str()));
    }

    // Invariant 3: once the name is on file, help never prompts again.
    #[test]
    fn prop_known_user_skips_the_prompt(name in arb_user_name(), text in arb_plain_message()) {
        let registry = default_registry();
        let mut session = Session::new();
        session.set(USERNAME_KEY, name.clone());

        let (state, replies) = run_turn(&registry, &mut session, DialogState::Idle, Some("help"), &text);

        prop_assert_eq!(state, DialogState::Idle);
        prop_assert_eq!(replies, vec![
            format!("Hi, {name}"),
            format!("You need help? {HELP_MESSAGE}"),
        ]);
    }

    // Invariant 4: a fresh trigger while a prompt is pending abandons the
    // old stack instead of resuming it.
    #[test]
    fn prop_fresh_trigger_discards_suspended_stack(text in arb_plain_message(), later in arb_plain_message()) {
        let registry = default_registry();
        let mut session = Session::new();

        let (state, _) = run_turn(&registry, &mut session, DialogState::Idle, Some("help"), "help");
        prop_assert!(state.is_suspended());

        let (state, replies) = run_turn(&registry, &mut session, state, Some("joke"), &text);
        prop_assert_eq!(&state, &DialogState::Idle);
        prop_assert!(is_joke_pair(&replies));

        // The discarded prompt is gone: an unrecognized message now falls
        // through to the default reply instead of resuming the greeter.
        let (_, replies) = run_turn(&registry, &mut session, state, None, &later);
        prop_assert_eq!(replies, vec![DEFAULT_REPLY.to_string()]);
    }

    // Invariant 5: reset always clears the stored name, whatever the rest
    // of the message says.
    #[test]
    fn prop_reset_always_forgets(name in arb_user_name(), suffix in "[a-z !]{0,20}") {
        let registry = default_registry();
        let mut session = Session::new();
        session.set(USERNAME_KEY, name);

        let text = format!("reset{suffix}");
        let (state, replies) = run_turn(&registry, &mut session, DialogState::Idle, None, &text);

        prop_assert_eq!(state, DialogState::Idle);
        prop_assert_eq!(replies, vec![RESET_CONFIRMATION.to_string()]);
        prop_assert_eq!(session.get(USERNAME_KEY), None);
    }

    // Invariant 6: the persisted dialog state survives a JSON round-trip.
    #[test]
    fn prop_dialog_state_roundtrips_through_json(state in arb_dialog_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let back: DialogState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, state);
    }

    // Invariant 7: so does the session.
    #[test]
    fn prop_session_roundtrips_through_json(entries in proptest::collection::hash_map("[a-z_]{1,10}", "[a-zA-Z0-9 ]{0,20}", 0..6)) {
        let mut session = Session::new();
        for (key, value) in &entries {
            session.set(key.clone(), value.clone());
        }

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, session);
    }
}

// ============================================================================
// Scenario tests
// ============================================================================

#[test]
fn test_full_conversation_flow() {
    let registry = default_registry();
    let mut session = Session::new();

    // An unrecognized opener gets the default nudge.
    let (state, replies) = run_turn(&registry, &mut session, DialogState::Idle, None, "hi");
    assert_eq!(replies, vec![DEFAULT_REPLY.to_string()]);

    // Asking for a joke lands the setup and the punchline.
    let (state, replies) = run_turn(&registry, &mut session, state, Some("joke"), "tell me a joke");
    assert!(is_joke_pair(&replies));

    // Help wants a name first.
    let (state, replies) = run_turn(&registry, &mut session, state, Some("help"), "help");
    assert_eq!(replies, vec![NAME_PROMPT.to_string()]);
    assert!(state.is_suspended());

    // The answer is greeted and help continues.
    let (state, replies) = run_turn(&registry, &mut session, state, None, "Ada");
    assert_eq!(
        replies,
        vec![
            "Hi, Ada".to_string(),
            format!("You need help? {HELP_MESSAGE}"),
        ]
    );
    assert_eq!(state, DialogState::Idle);
    assert_eq!(session.get(USERNAME_KEY), Some("Ada"));

    // Second help skips the prompt entirely.
    let (state, replies) = run_turn(&registry, &mut session, state, Some("help"), "help");
    assert_eq!(
        replies,
        vec![
            "Hi, Ada".to_string(),
            format!("You need help? {HELP_MESSAGE}"),
        ]
    );

    // Reset wipes the name, so help prompts again.
    let (state, replies) = run_turn(&registry, &mut session, state, None, "reset please");
    assert_eq!(replies, vec![RESET_CONFIRMATION.to_string()]);
    let (state, replies) = run_turn(&registry, &mut session, state, Some("help"), "help");
    assert_eq!(replies, vec![NAME_PROMPT.to_string()]);
    assert!(state.is_suspended());
}

#[test]
fn test_mid_prompt_trigger_switches_dialogs() {
    let registry = default_registry();
    let mut session = Session::new();

    let (state, _) = run_turn(&registry, &mut session, DialogState::Idle, Some("help"), "help");
    assert_eq!(state.active_dialog(), Some("greet"));

    // A joke request interrupts the pending name prompt.
    let (state, replies) = run_turn(&registry, &mut session, state, Some("joke"), "joke time");
    assert!(is_joke_pair(&replies));
    assert_eq!(state, DialogState::Idle);

    // And the interrupted greeter never got an answer to store.
    assert_eq!(session.get(USERNAME_KEY), None);
}
