use std::sync::{mpsc, Arc};
use std::time::Duration;

use agent_chat_core::SessionId;
use chat_logging::{chat_debug, chat_info, chat_warn};
use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::decode::decode_push_event;
use crate::sse::SseParser;
use crate::transport::Transport;
use crate::{EngineEvent, PushEvent, TransportError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Push channel opener. Each opened channel reconnects on its own until closed.
#[derive(Clone)]
pub struct EventChannel {
    transport: Arc<dyn Transport>,
    reconnect_delay: Duration,
}

impl EventChannel {
    pub fn new(transport: Arc<dyn Transport>, reconnect_delay: Duration) -> Self {
        Self {
            transport,
            reconnect_delay,
        }
    }

    /// Starts streaming events for `session_id` into `sink` on `runtime`.
    pub fn open(
        &self,
        runtime: &Handle,
        session_id: SessionId,
        sink: Arc<dyn EventSink>,
    ) -> ChannelHandle {
        let cancel = CancellationToken::new();
        runtime.spawn(run_channel(
            self.transport.clone(),
            session_id,
            self.reconnect_delay,
            sink,
            cancel.clone(),
        ));
        ChannelHandle { cancel }
    }
}

/// Owns a running push channel; closing or dropping it stops the stream.
pub struct ChannelHandle {
    cancel: CancellationToken,
}

impl ChannelHandle {
    pub fn close(self) {
        self.cancel.cancel();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_channel(
    transport: Arc<dyn Transport>,
    session_id: SessionId,
    reconnect_delay: Duration,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut parser = SseParser::new();
    chat_info!("Opening push channel sid={}", session_id);

    loop {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = stream_once(transport.as_ref(), &session_id, &mut parser, sink.as_ref()) => outcome,
        };
        match outcome {
            Ok(()) => chat_info!("Push channel ended by server sid={}", session_id),
            Err(err) => chat_warn!("Push channel error sid={}: {}", session_id, err),
        }

        parser.reset_pending();
        let delay = parser.retry().unwrap_or(reconnect_delay);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
        chat_debug!("Reconnecting push channel after {:?}", delay);
    }

    chat_info!("Push channel closed sid={}", session_id);
}

async fn stream_once(
    transport: &dyn Transport,
    session_id: &SessionId,
    parser: &mut SseParser,
    sink: &dyn EventSink,
) -> Result<(), TransportError> {
    let mut stream = transport
        .connect_stream(session_id, parser.last_event_id())
        .await?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for frame in parser.feed(&chunk) {
            match decode_push_event(&frame.event, &frame.data) {
                PushEvent::Ignored { event, reason } => {
                    chat_debug!("Ignoring push event {:?}: {}", event, reason);
                }
                event => sink.emit(EngineEvent::Push(event)),
            }
        }
    }
    Ok(())
}
