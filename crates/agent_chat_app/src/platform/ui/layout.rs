use super::constants::*;
use super::UiCommand;

const STYLESHEET: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; background: #f4f5f7; }
.chat { display: flex; flex-direction: column; height: 100vh; max-width: 860px; margin: 0 auto; }
.header { display: flex; justify-content: space-between; align-items: baseline; padding: 12px 16px; border-bottom: 1px solid #d0d7de; }
.header .brand { font-weight: 600; }
.header .session { color: #656d76; font-size: 12px; font-family: ui-monospace, monospace; }
.message-list { flex: 1; overflow-y: auto; padding: 16px; }
.row { display: flex; margin: 6px 0; }
.row-user { justify-content: flex-end; }
.row-assistant { justify-content: flex-start; }
.bubble { max-width: 75%; padding: 8px 12px; border-radius: 12px; white-space: pre-wrap; overflow-wrap: anywhere; }
.bubble-user { background: #2f6feb; color: #fff; }
.bubble-assistant { background: #fff; color: #1f2328; }
.bubble-html { white-space: normal; }
.bubble-table { overflow: hidden; }
.table-scroll { overflow-x: auto; }
.table-scroll table { border-collapse: collapse; }
.table-scroll td, .table-scroll th { border: 1px solid #d0d7de; padding: 4px 8px; }
.typing { padding: 0 16px 8px; color: #656d76; font-style: italic; }
.progress { width: 100%; }
.composer { display: flex; gap: 8px; padding: 12px 16px; border-top: 1px solid #d0d7de; }
.composer textarea { flex: 1; resize: none; line-height: 20px; padding: 8px; }
";

/// Commands that build the empty page shell.
#[allow(clippy::vec_init_then_push)]
pub fn initial_commands() -> Vec<UiCommand> {
    let mut commands = Vec::new();

    commands.push(UiCommand::CreatePage {
        title: PAGE_TITLE.to_string(),
        stylesheet: STYLESHEET.to_string(),
    });
    commands.push(UiCommand::CreateHeader {
        element: HEADER,
        title: HEADER_TITLE.to_string(),
    });
    commands.push(UiCommand::CreateMessageList {
        element: MESSAGE_LIST,
    });
    commands.push(UiCommand::CreateTypingIndicator {
        element: TYPING_INDICATOR,
        text: "Agents are working…".to_string(),
    });
    commands.push(UiCommand::CreateProgressBar {
        element: PROGRESS_BAR,
    });
    commands.push(UiCommand::CreateInput {
        element: INPUT_MESSAGE,
        placeholder: "Describe a task for the agents".to_string(),
    });
    commands.push(UiCommand::CreateButton {
        element: BUTTON_SEND,
        text: "Send".to_string(),
    });

    commands
}

/// Height of the input box for `text`: one row per visual line, clamped.
pub fn input_height_px(text: &str) -> u32 {
    let lines: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(INPUT_WRAP_COLUMNS).max(1))
        .sum();
    let lines = u32::try_from(lines).unwrap_or(u32::MAX);
    lines
        .saturating_mul(INPUT_LINE_HEIGHT_PX)
        .saturating_add(INPUT_PADDING_PX)
        .clamp(MIN_INPUT_HEIGHT_PX, MAX_INPUT_HEIGHT_PX)
}
