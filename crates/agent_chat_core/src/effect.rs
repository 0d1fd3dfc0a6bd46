use crate::{SessionId, TurnId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenChannel {
        session_id: SessionId,
    },
    SubmitTurn {
        turn_id: TurnId,
        session_id: SessionId,
        text: String,
        client_id: Option<String>,
    },
    CloseChannel,
}
