use serde::Deserialize;
use serde_json::Value;

use crate::{IgnoreReason, PushEvent};

/// Content used when an assistant event carries no text parts.
pub const EMPTY_ASSISTANT_TEXT: &str = "(message)";

const ERROR_PREFIX: &str = "❌ ";
const WARN_PREFIX: &str = "⚠️ ";

#[derive(Debug, Deserialize)]
struct OpenPayload {
    #[serde(default)]
    client_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    #[serde(default)]
    progress: Option<Value>,
    #[serde(default)]
    params: Option<ProgressParams>,
}

#[derive(Debug, Deserialize)]
struct ProgressParams {
    #[serde(default)]
    progress: Option<Value>,
}

/// Decode one named push-channel event. Never fails: anything unusable comes
/// back as [`PushEvent::Ignored`].
pub fn decode_push_event(event: &str, data: &str) -> PushEvent {
    let decoded = match event {
        "open" => decode_open(data),
        "progress" => decode_progress(data),
        "assistant" => decode_assistant(data),
        _ => Err(IgnoreReason::UnknownEvent),
    };
    decoded.unwrap_or_else(|reason| PushEvent::Ignored {
        event: event.to_string(),
        reason,
    })
}

fn parse<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, IgnoreReason> {
    serde_json::from_str(data).map_err(|err| IgnoreReason::MalformedJson(err.to_string()))
}

fn decode_open(data: &str) -> Result<PushEvent, IgnoreReason> {
    let payload: OpenPayload = parse(data)?;
    let client_id = match payload.client_id {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(IgnoreReason::MissingField("client_id")),
    };
    Ok(PushEvent::Open { client_id })
}

fn decode_progress(data: &str) -> Result<PushEvent, IgnoreReason> {
    let payload: ProgressPayload = parse(data)?;
    let raw = payload
        .progress
        .or_else(|| payload.params.and_then(|params| params.progress))
        .ok_or(IgnoreReason::MissingField("progress"))?;

    let fraction = numeric_value(&raw).ok_or(IgnoreReason::NotANumber)?;
    let percent = (fraction * 100.0).round();
    if !percent.is_finite() {
        return Err(IgnoreReason::NotANumber);
    }
    Ok(PushEvent::Progress {
        percent: percent as i64,
    })
}

/// Accepts JSON numbers and numeric strings.
fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Any JSON value is accepted; missing `params` or `data` yields the placeholder
/// text. Only a `data` that is present but not an array is rejected.
fn decode_assistant(data: &str) -> Result<PushEvent, IgnoreReason> {
    let root: Value = parse(data)?;
    let params = root.get("params");

    let parts: Vec<&str> = match params.and_then(|params| params.get("data")) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|entry| entry.get("text").and_then(Value::as_str))
            .collect(),
        Some(_) => return Err(IgnoreReason::UnexpectedShape("params.data")),
    };

    let joined = parts.join(" ");
    let body = match joined.trim() {
        "" => EMPTY_ASSISTANT_TEXT,
        trimmed => trimmed,
    };

    let prefix = match params
        .and_then(|params| params.get("level"))
        .and_then(Value::as_str)
    {
        Some("error") => ERROR_PREFIX,
        Some("warn") => WARN_PREFIX,
        _ => "",
    };

    Ok(PushEvent::Assistant {
        content: format!("{prefix}{body}"),
    })
}
