//! Agent chat engine: push channel, event decoding, transport and sanitizing.
mod channel;
mod decode;
mod engine;
mod sanitize;
mod sse;
mod transport;
mod types;

pub use channel::{ChannelEventSink, ChannelHandle, EventChannel, EventSink};
pub use decode::{decode_push_event, EMPTY_ASSISTANT_TEXT};
pub use engine::{EngineError, EngineHandle};
pub use sanitize::{contains_table, escape_html, looks_like_html, sanitize};
pub use sse::{SseFrame, SseParser};
pub use transport::{
    EventStream, ReqwestTransport, Transport, TransportSettings, UNPARSEABLE_REPLY,
};
pub use types::{EngineEvent, FailureKind, IgnoreReason, PushEvent, TransportError, TurnReply};
