use crate::view_model::{ChatViewModel, MessageView};
use crate::{SessionId, TurnId};

/// Assistant message every conversation starts with.
pub const GREETING: &str = "Hi! How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Position-independent message identity, assigned on append.
pub type MessageId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Assistant entry reserved for an in-flight turn.
    pub pending_placeholder: bool,
}

impl Message {
    fn new(id: MessageId, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            pending_placeholder: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session_id: SessionId,
    messages: Vec<Message>,
    next_message_id: MessageId,
    input: String,
    in_flight: Option<TurnId>,
    next_turn_id: TurnId,
    progress_percent: Option<i64>,
    assigned_client_id: Option<String>,
    list_revision: u64,
    dirty: bool,
}

impl AppState {
    /// Fresh conversation for `session_id`, seeded with the assistant greeting.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: vec![Message::new(0, Role::Assistant, GREETING.to_string())],
            next_message_id: 1,
            input: String::new(),
            in_flight: None,
            next_turn_id: 1,
            progress_percent: None,
            assigned_client_id: None,
            list_revision: 0,
            dirty: true,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_typing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<TurnId> {
        self.in_flight
    }

    /// Raw progress as reported upstream; not clamped.
    pub fn progress_percent(&self) -> Option<i64> {
        self.progress_percent
    }

    pub fn assigned_client_id(&self) -> Option<&str> {
        self.assigned_client_id.as_deref()
    }

    pub fn view(&self) -> ChatViewModel {
        ChatViewModel {
            session_id: self.session_id.clone(),
            messages: self
                .messages
                .iter()
                .filter(|message| !(message.pending_placeholder && message.content.is_empty()))
                .map(MessageView::from)
                .collect(),
            is_typing: self.is_typing(),
            progress_percent: self.progress_percent.map(crate::clamp_percent),
            input: self.input.clone(),
            list_revision: self.list_revision,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn append_message(&mut self, role: Role, content: String) {
        self.push_message(role, content);
        self.touch_list();
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_progress(&mut self, percent: Option<i64>) {
        if self.progress_percent != percent {
            self.progress_percent = percent;
            self.dirty = true;
        }
    }

    pub(crate) fn set_client_id(&mut self, client_id: String) {
        self.assigned_client_id = Some(client_id);
    }

    /// Records the user message, reserves a placeholder and marks the turn in flight.
    /// Progress restarts at zero.
    pub(crate) fn begin_turn(&mut self, text: &str) -> TurnId {
        let turn_id = self.next_turn_id;
        self.next_turn_id += 1;
        self.push_message(Role::User, text.to_string());
        let placeholder = self.push_message(Role::Assistant, String::new());
        placeholder.pending_placeholder = true;
        self.in_flight = Some(turn_id);
        self.input.clear();
        self.progress_percent = Some(0);
        self.touch_list();
        turn_id
    }

    /// Resolves the in-flight turn. An empty `content` drops the placeholder.
    /// Replies for any other turn are ignored. Progress is left as last reported.
    pub(crate) fn finish_turn(&mut self, turn_id: TurnId, content: String) {
        if self.in_flight != Some(turn_id) {
            return;
        }
        self.in_flight = None;

        if let Some(index) = self
            .messages
            .iter()
            .rposition(|message| message.pending_placeholder)
        {
            if content.is_empty() {
                self.messages.remove(index);
            } else {
                let placeholder = &mut self.messages[index];
                placeholder.content = content;
                placeholder.pending_placeholder = false;
            }
        }
        self.touch_list();
    }

    fn push_message(&mut self, role: Role, content: String) -> &mut Message {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message::new(id, role, content));
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }

    fn touch_list(&mut self) {
        self.list_revision += 1;
        self.dirty = true;
    }
}
