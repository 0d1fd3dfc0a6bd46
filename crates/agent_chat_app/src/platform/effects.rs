use agent_chat_core::{Effect, Msg};
use agent_chat_engine::{EngineEvent, EngineHandle, PushEvent};
use chat_logging::{chat_info, chat_warn};

/// Executes core effects on the engine and turns engine output back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenChannel { session_id } => {
                    self.engine.open_channel(session_id);
                }
                Effect::SubmitTurn {
                    turn_id,
                    session_id,
                    text,
                    client_id,
                } => {
                    chat_info!(
                        "SubmitTurn turn_id={} sid={} text_len={} client_id={}",
                        turn_id,
                        session_id,
                        text.len(),
                        client_id.as_deref().unwrap_or("-")
                    );
                    self.engine.submit_turn(turn_id, session_id, text, client_id);
                }
                Effect::CloseChannel => {
                    chat_info!("CloseChannel");
                    self.engine.close_channel();
                }
            }
        }
    }

    /// Drains every engine event that is ready.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .filter_map(map_event)
            .collect()
    }
}

/// Ignored push events are dropped and logged by the push channel, so they map to nothing here.
pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::Push(PushEvent::Open { client_id }) => {
            chat_info!("Push channel assigned client_id={}", client_id);
            Msg::ChannelOpened { client_id }
        }
        EngineEvent::Push(PushEvent::Progress { percent }) => Msg::ProgressReported { percent },
        EngineEvent::Push(PushEvent::Assistant { content }) => Msg::AssistantPushed { content },
        EngineEvent::Push(PushEvent::Ignored { .. }) => return None,
        EngineEvent::TurnCompleted { turn_id, result } => match result {
            Ok(reply) => {
                chat_info!(
                    "Turn {} completed reply_len={}",
                    turn_id,
                    reply.reply.len()
                );
                Msg::TurnReplied {
                    turn_id,
                    reply: reply.reply,
                }
            }
            Err(error) => {
                chat_warn!("Turn {} failed: {}", turn_id, error);
                Msg::TurnFailed {
                    turn_id,
                    error: error.to_string(),
                }
            }
        },
    };
    Some(msg)
}
