use std::time::Duration;

use agent_chat_core::SessionId;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::{FailureKind, TransportError, TurnReply};

const EVENT_STREAM: &str = "text/event-stream";
const LAST_EVENT_ID: &str = "Last-Event-ID";

/// Raw push-channel body chunks.
pub type EventStream = BoxStream<'static, Result<Bytes, TransportError>>;

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub sse_path: String,
    pub start_conversation_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Wait before reopening the push channel unless the server sent `retry:`.
    pub reconnect_delay: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            sse_path: "/sse".to_string(),
            start_conversation_path: "/start_conversation".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Serialize)]
struct TurnRequest<'a> {
    user_query: &'a str,
    client_id: Option<&'a str>,
}

/// Reply shown when a successful response carries no `llm_response`.
pub const UNPARSEABLE_REPLY: &str = "Sorry, I couldn't parse the response.";

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// One-shot call carrying the user's message for this session.
    async fn submit_turn(
        &self,
        session_id: &SessionId,
        text: &str,
        client_id: Option<&str>,
    ) -> Result<TurnReply, TransportError>;

    /// Opens one connection of the push channel and returns its body.
    async fn connect_stream(
        &self,
        session_id: &SessionId,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    turn_client: reqwest::Client,
    stream_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let turn_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        // The push channel is long-lived, so only the connect phase is bounded.
        let stream_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            turn_client,
            stream_client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.settings.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn turn_url(&self, session_id: &SessionId) -> Result<Url, TransportError> {
        let mut url = self.endpoint(&self.settings.start_conversation_path)?;
        url.path_segments_mut()
            .map_err(|()| TransportError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .push(session_id.as_str());
        Ok(url)
    }

    fn stream_url(&self, session_id: &SessionId) -> Result<Url, TransportError> {
        let mut url = self.endpoint(&self.settings.sse_path)?;
        url.query_pairs_mut().append_pair("sid", session_id.as_str());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn submit_turn(
        &self,
        session_id: &SessionId,
        text: &str,
        client_id: Option<&str>,
    ) -> Result<TurnReply, TransportError> {
        let url = self.turn_url(session_id)?;
        let response = self
            .turn_client
            .post(url)
            .json(&TurnRequest {
                user_query: text,
                client_id,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: Value = serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(FailureKind::InvalidResponse, err.to_string()))?;
        Ok(TurnReply {
            reply: reply_text(&parsed),
        })
    }

    async fn connect_stream(
        &self,
        session_id: &SessionId,
        last_event_id: Option<&str>,
    ) -> Result<EventStream, TransportError> {
        let url = self.stream_url(session_id)?;
        let mut request = self
            .stream_client
            .get(url)
            .header(ACCEPT, EVENT_STREAM)
            .header(CACHE_CONTROL, "no-cache");
        if let Some(id) = last_event_id {
            request = request.header(LAST_EVENT_ID, id);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case(EVENT_STREAM) {
            return Err(TransportError::new(
                FailureKind::InvalidResponse,
                format!("unexpected content type {content_type:?}"),
            ));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed())
    }
}

/// `llm_response` as display text. Missing or null yields [`UNPARSEABLE_REPLY`];
/// non-string values are shown as JSON.
fn reply_text(body: &Value) -> String {
    match body.get("llm_response") {
        None | Some(Value::Null) => UNPARSEABLE_REPLY.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return TransportError::new(FailureKind::InvalidResponse, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
