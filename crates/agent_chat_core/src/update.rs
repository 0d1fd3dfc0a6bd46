use crate::{AppState, Effect, Msg, Role};

/// Marker that starts every inline failure message.
pub const WARNING_MARKER: &str = "⚠️";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => vec![Effect::OpenChannel {
            session_id: state.session_id().clone(),
        }],
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked => {
            if state.input().trim().is_empty() || state.is_typing() {
                return (state, Vec::new());
            }
            let text = state.input().to_string();
            let turn_id = state.begin_turn(&text);
            vec![Effect::SubmitTurn {
                turn_id,
                session_id: state.session_id().clone(),
                text,
                client_id: state.assigned_client_id().map(ToOwned::to_owned),
            }]
        }
        Msg::ChannelOpened { client_id } => {
            state.set_client_id(client_id);
            Vec::new()
        }
        Msg::ProgressReported { percent } => {
            state.set_progress(Some(percent));
            Vec::new()
        }
        Msg::AssistantPushed { content } => {
            state.append_message(Role::Assistant, content);
            Vec::new()
        }
        Msg::TurnReplied { turn_id, reply } => {
            state.finish_turn(turn_id, reply);
            Vec::new()
        }
        Msg::TurnFailed { turn_id, error } => {
            state.finish_turn(turn_id, failure_message(&error));
            Vec::new()
        }
        Msg::Unmounted => vec![Effect::CloseChannel],
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Inline assistant text shown when a one-shot call fails.
pub fn failure_message(error: &str) -> String {
    format!("{WARNING_MARKER} Error fetching reply: {error}")
}
