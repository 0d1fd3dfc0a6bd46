pub mod constants;
pub mod layout;
pub mod render;
pub mod surface;

use agent_chat_core::{MessageId, Role};

/// Stable identifier of one page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(&'static str);

impl ElementId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// How a message body is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    PlainText,
    Html,
    /// HTML holding a table; wrapped in a horizontally scrolling container.
    Table,
}

/// One rendered message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMarkup {
    pub id: MessageId,
    pub role: Role,
    pub kind: ContentKind,
    /// Markup safe to inject into the page.
    pub html: String,
    /// Unprocessed message content, used for the terminal transcript.
    pub text: String,
}

/// Commands the renderer issues against a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    CreatePage {
        title: String,
        stylesheet: String,
    },
    /// Page header; its text is the session line.
    CreateHeader {
        element: ElementId,
        title: String,
    },
    CreateMessageList {
        element: ElementId,
    },
    CreateTypingIndicator {
        element: ElementId,
        text: String,
    },
    CreateProgressBar {
        element: ElementId,
    },
    CreateInput {
        element: ElementId,
        placeholder: String,
    },
    CreateButton {
        element: ElementId,
        text: String,
    },
    ReplaceMessages {
        element: ElementId,
        items: Vec<MessageMarkup>,
    },
    SetVisible {
        element: ElementId,
        visible: bool,
    },
    SetProgress {
        element: ElementId,
        percent: Option<u8>,
    },
    SetText {
        element: ElementId,
        text: String,
    },
    SetHeight {
        element: ElementId,
        px: u32,
    },
    SetEnabled {
        element: ElementId,
        enabled: bool,
    },
    ScrollToLatest {
        element: ElementId,
    },
}
