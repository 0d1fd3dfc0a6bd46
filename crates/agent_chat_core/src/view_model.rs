use crate::{Message, MessageId, Role, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatViewModel {
    /// Identity shown in the page header.
    pub session_id: SessionId,
    /// Visible messages in append order; empty placeholders are left out.
    pub messages: Vec<MessageView>,
    pub is_typing: bool,
    /// Progress clamped to `0..=100`.
    pub progress_percent: Option<u8>,
    pub input: String,
    /// Changes whenever the message list or typing flag changes.
    pub list_revision: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Clamps an upstream percentage into the displayable range.
pub fn clamp_percent(percent: i64) -> u8 {
    percent.clamp(0, 100) as u8
}
