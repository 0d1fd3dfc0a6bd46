//! Agent chat core: pure conversation state machine and view-model helpers.
mod effect;
mod msg;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use session::{SessionId, TurnId};
pub use state::{AppState, Message, MessageId, Role, GREETING};
pub use update::{failure_message, update, WARNING_MARKER};
pub use view_model::{clamp_percent, ChatViewModel, MessageView};
