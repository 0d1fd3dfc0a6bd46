use std::fmt;

use agent_chat_core::TurnId;

/// Decoded push-channel event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    Open { client_id: String },
    /// Progress as an unclamped integer percentage.
    Progress { percent: i64 },
    Assistant { content: String },
    Ignored { event: String, reason: IgnoreReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownEvent,
    MalformedJson(String),
    MissingField(&'static str),
    UnexpectedShape(&'static str),
    NotANumber,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::UnknownEvent => write!(f, "unrecognized event"),
            IgnoreReason::MalformedJson(detail) => write!(f, "malformed json: {detail}"),
            IgnoreReason::MissingField(field) => write!(f, "missing field {field}"),
            IgnoreReason::UnexpectedShape(field) => write!(f, "unexpected shape of {field}"),
            IgnoreReason::NotANumber => write!(f, "value is not a finite number"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Push(PushEvent),
    TurnCompleted {
        turn_id: TurnId,
        result: Result<TurnReply, TransportError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
