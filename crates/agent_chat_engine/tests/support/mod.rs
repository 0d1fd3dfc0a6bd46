#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_chat_core::SessionId;
use agent_chat_engine::{
    EngineEvent, EventSink, EventStream, FailureKind, Transport, TransportError, TurnReply,
};
use bytes::Bytes;
use futures_util::StreamExt;

/// Transport double: each push connection replays the next scripted body.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<Vec<&'static [u8]>>>,
    connects: Mutex<Vec<Option<String>>>,
}

impl ScriptedTransport {
    pub fn new(scripts: Vec<Vec<&'static [u8]>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            connects: Mutex::new(Vec::new()),
        }
    }

    /// `Last-Event-ID` sent on each connection attempt, in order.
    pub fn connects(&self) -> Vec<Option<String>> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn submit_turn(
        &self,
        _session_id: &SessionId,
        text: &str,
        client_id: Option<&str>,
    ) -> Result<TurnReply, TransportError> {
        if text == "fail" {
            return Err(TransportError {
                kind: FailureKind::HttpStatus(502),
                message: "502 Bad Gateway".to_string(),
            });
        }
        Ok(TurnReply {
            reply: format!("echo {text} from {}", client_id.unwrap_or("nobody")),
        })
    }

    async fn connect_stream(
        &self,
        _session_id: &SessionId,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, TransportError> {
        self.connects
            .lock()
            .unwrap()
            .push(last_event_id.map(ToOwned::to_owned));
        let Some(chunks) = self.scripts.lock().unwrap().pop_front() else {
            return Err(TransportError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            });
        };
        let chunks: Vec<Result<Bytes, TransportError>> = chunks
            .into_iter()
            .map(|chunk| Ok(Bytes::from_static(chunk)))
            .collect();
        Ok(futures_util::stream::iter(chunks).boxed())
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub async fn wait_for(&self, count: usize) -> Vec<EngineEvent> {
        for _ in 0..250 {
            let events = self.snapshot();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("timed out waiting for {count} events, got {:?}", self.snapshot());
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
