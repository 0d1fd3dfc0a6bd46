use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use agent_chat_core::{SessionId, TurnId};
use chat_logging::{chat_debug, chat_info};

use crate::channel::{ChannelEventSink, ChannelHandle, EventChannel, EventSink};
use crate::transport::{ReqwestTransport, Transport, TransportSettings};
use crate::{EngineEvent, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build transport: {0}")]
    Transport(#[from] TransportError),
}

enum EngineCommand {
    OpenChannel {
        session_id: SessionId,
    },
    CloseChannel,
    SubmitTurn {
        turn_id: TurnId,
        session_id: SessionId,
        text: String,
        client_id: Option<String>,
    },
}

/// Background IO worker. Commands go in, [`EngineEvent`]s come out.
///
/// Dropping the handle stops the worker and closes any open push channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: TransportSettings) -> Result<Self, EngineError> {
        let reconnect_delay = settings.reconnect_delay;
        let transport = ReqwestTransport::new(settings)?;
        Self::with_transport(Arc::new(transport), reconnect_delay)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        reconnect_delay: Duration,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let channel = EventChannel::new(transport.clone(), reconnect_delay);

        thread::spawn(move || {
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx.clone()));
            let mut open: Option<ChannelHandle> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::OpenChannel { session_id } => {
                        if let Some(previous) = open.take() {
                            previous.close();
                        }
                        open = Some(channel.open(runtime.handle(), session_id, sink.clone()));
                    }
                    EngineCommand::CloseChannel => {
                        if let Some(handle) = open.take() {
                            handle.close();
                        }
                    }
                    EngineCommand::SubmitTurn {
                        turn_id,
                        session_id,
                        text,
                        client_id,
                    } => {
                        let transport = transport.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = transport
                                .submit_turn(&session_id, &text, client_id.as_deref())
                                .await;
                            let _ = event_tx.send(EngineEvent::TurnCompleted { turn_id, result });
                        });
                    }
                }
            }

            drop(open);
            chat_debug!("Engine command loop stopped");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn open_channel(&self, session_id: SessionId) {
        chat_info!("OpenChannel sid={}", session_id);
        let _ = self.cmd_tx.send(EngineCommand::OpenChannel { session_id });
    }

    pub fn close_channel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CloseChannel);
    }

    pub fn submit_turn(
        &self,
        turn_id: TurnId,
        session_id: SessionId,
        text: impl Into<String>,
        client_id: Option<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitTurn {
            turn_id,
            session_id,
            text: text.into(),
            client_id,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
