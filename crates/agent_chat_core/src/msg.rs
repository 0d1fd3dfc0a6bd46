use crate::TurnId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The chat surface is ready; the push channel should be opened.
    Mounted,
    /// User edited the message input box.
    InputChanged(String),
    /// User submitted the current input.
    SendClicked,
    /// Push channel reported the server-assigned client id.
    ChannelOpened { client_id: String },
    /// Push channel reported progress, already scaled to a percentage.
    ProgressReported { percent: i64 },
    /// Push channel delivered an assistant message.
    AssistantPushed { content: String },
    /// The one-shot call for `turn_id` succeeded.
    TurnReplied { turn_id: TurnId, reply: String },
    /// The one-shot call for `turn_id` failed.
    TurnFailed { turn_id: TurnId, error: String },
    /// The chat surface is going away; the push channel should be closed.
    Unmounted,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
