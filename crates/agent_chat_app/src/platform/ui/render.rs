use agent_chat_core::{ChatViewModel, MessageView};
use agent_chat_engine::{contains_table, escape_html, looks_like_html, sanitize};

use super::constants::*;
use super::layout::input_height_px;
use super::{ContentKind, MessageMarkup, UiCommand};

/// Commands that bring the surface in line with `view`.
///
/// `last_revision` is the list revision of the previous render; a change
/// scrolls the list to its newest entry.
#[allow(clippy::vec_init_then_push)]
pub fn render(view: &ChatViewModel, last_revision: Option<u64>) -> Vec<UiCommand> {
    let mut cmds = Vec::new();

    cmds.push(UiCommand::SetText {
        element: HEADER,
        text: session_line(view),
    });
    cmds.push(UiCommand::ReplaceMessages {
        element: MESSAGE_LIST,
        items: view.messages.iter().map(message_markup).collect(),
    });
    cmds.push(UiCommand::SetVisible {
        element: TYPING_INDICATOR,
        visible: view.is_typing,
    });
    cmds.push(UiCommand::SetProgress {
        element: PROGRESS_BAR,
        percent: view.progress_percent,
    });
    cmds.push(UiCommand::SetText {
        element: INPUT_MESSAGE,
        text: view.input.clone(),
    });
    cmds.push(UiCommand::SetHeight {
        element: INPUT_MESSAGE,
        px: input_height_px(&view.input),
    });
    cmds.push(UiCommand::SetEnabled {
        element: BUTTON_SEND,
        enabled: !view.is_typing && !view.input.trim().is_empty(),
    });

    if last_revision != Some(view.list_revision) {
        cmds.push(UiCommand::ScrollToLatest {
            element: MESSAGE_LIST,
        });
    }

    cmds
}

fn session_line(view: &ChatViewModel) -> String {
    format!("User ID: {}", view.session_id)
}

pub fn classify(content: &str) -> ContentKind {
    if !looks_like_html(content) {
        ContentKind::PlainText
    } else if contains_table(content) {
        ContentKind::Table
    } else {
        ContentKind::Html
    }
}

pub fn message_markup(message: &MessageView) -> MessageMarkup {
    let kind = classify(&message.content);
    let html = match kind {
        ContentKind::PlainText => escape_html(&message.content),
        ContentKind::Html => sanitize(&message.content),
        ContentKind::Table => format!(
            "<div class=\"table-scroll\">{}</div>",
            sanitize(&message.content)
        ),
    };
    MessageMarkup {
        id: message.id,
        role: message.role,
        kind,
        html,
        text: message.content.clone(),
    }
}
