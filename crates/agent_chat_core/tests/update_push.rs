use std::sync::Once;

use agent_chat_core::{update, AppState, Msg, Role, SessionId, GREETING};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

fn user(content: &str) -> (Role, String) {
    (Role::User, content.to_string())
}

fn assistant(content: &str) -> (Role, String) {
    (Role::Assistant, content.to_string())
}

/// Role and content of every logged message, placeholders included.
fn log(state: &AppState) -> Vec<(Role, String)> {
    state
        .messages()
        .iter()
        .map(|message| (message.role, message.content.clone()))
        .collect()
}

fn new_state() -> AppState {
    AppState::new(SessionId::from("push-session"))
}

#[test]
fn channel_open_assigns_client_id() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::ChannelOpened {
            client_id: "client-9".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.assigned_client_id(), Some("client-9"));

    let (state, _) = update(
        state,
        Msg::ChannelOpened {
            client_id: "client-10".to_string(),
        },
    );
    assert_eq!(state.assigned_client_id(), Some("client-10"));
}

#[test]
fn progress_is_stored_raw_and_clamped_in_view() {
    init_logging();
    let (state, _) = update(new_state(), Msg::ProgressReported { percent: 140 });
    assert_eq!(state.progress_percent(), Some(140));
    assert_eq!(state.view().progress_percent, Some(100));

    let (state, _) = update(state, Msg::ProgressReported { percent: -3 });
    assert_eq!(state.progress_percent(), Some(-3));
    assert_eq!(state.view().progress_percent, Some(0));

    let (state, _) = update(state, Msg::ProgressReported { percent: 57 });
    assert_eq!(state.view().progress_percent, Some(57));
}

#[test]
fn pushed_assistant_messages_are_appended() {
    init_logging();
    let (state, _) = update(
        new_state(),
        Msg::AssistantPushed {
            content: "planning".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::AssistantPushed {
            content: "planning".to_string(),
        },
    );

    assert_eq!(
        log(&state),
        vec![
            assistant(GREETING),
            assistant("planning"),
            assistant("planning"),
        ]
    );
}

#[test]
fn pushed_message_during_turn_does_not_fill_placeholder() {
    init_logging();
    let (state, _) = update(new_state(), Msg::InputChanged("hello".to_string()));
    let (state, _) = update(state, Msg::SendClicked);
    let (state, _) = update(
        state,
        Msg::AssistantPushed {
            content: "step 1 done".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::TurnReplied {
            turn_id: 1,
            reply: "final answer".to_string(),
        },
    );

    assert_eq!(
        log(&state),
        vec![
            assistant(GREETING),
            user("hello"),
            assistant("final answer"),
            assistant("step 1 done"),
        ]
    );
}

#[test]
fn progress_starts_at_zero_and_survives_turn_completion() {
    init_logging();
    let (state, _) = update(new_state(), Msg::InputChanged("go".to_string()));
    let (state, _) = update(state, Msg::SendClicked);
    assert_eq!(state.progress_percent(), Some(0));
    assert_eq!(state.view().progress_percent, Some(0));

    let (state, _) = update(state, Msg::ProgressReported { percent: 100 });
    let (state, _) = update(
        state,
        Msg::TurnReplied {
            turn_id: 1,
            reply: "done".to_string(),
        },
    );
    assert!(!state.is_typing());
    assert_eq!(state.view().progress_percent, Some(100));
}

#[test]
fn next_send_restarts_progress_at_zero() {
    init_logging();
    let (state, _) = update(new_state(), Msg::InputChanged("one".to_string()));
    let (state, _) = update(state, Msg::SendClicked);
    let (state, _) = update(state, Msg::ProgressReported { percent: 80 });
    let (state, _) = update(
        state,
        Msg::TurnFailed {
            turn_id: 1,
            error: "timeout".to_string(),
        },
    );
    assert_eq!(state.progress_percent(), Some(80));

    let (state, _) = update(state, Msg::InputChanged("two".to_string()));
    let (state, _) = update(state, Msg::SendClicked);
    assert_eq!(state.progress_percent(), Some(0));
}
