use super::ElementId;

pub const HEADER: ElementId = ElementId::new("session-header");
pub const MESSAGE_LIST: ElementId = ElementId::new("message-list");
pub const TYPING_INDICATOR: ElementId = ElementId::new("typing-indicator");
pub const PROGRESS_BAR: ElementId = ElementId::new("progress");
pub const INPUT_MESSAGE: ElementId = ElementId::new("message-input");
pub const BUTTON_SEND: ElementId = ElementId::new("send");

pub const PAGE_TITLE: &str = "Autonomous Agents";
pub const HEADER_TITLE: &str = "Autonomous Agents Chat";

// Input autosize.
pub const INPUT_LINE_HEIGHT_PX: u32 = 20;
pub const INPUT_PADDING_PX: u32 = 16;
pub const MIN_INPUT_HEIGHT_PX: u32 = 40;
pub const MAX_INPUT_HEIGHT_PX: u32 = 160;
pub const INPUT_WRAP_COLUMNS: usize = 60;
