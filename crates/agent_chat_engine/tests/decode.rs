use agent_chat_engine::{decode_push_event, IgnoreReason, PushEvent, EMPTY_ASSISTANT_TEXT};
use pretty_assertions::assert_eq;

fn progress(percent: i64) -> PushEvent {
    PushEvent::Progress { percent }
}

fn assistant(content: &str) -> PushEvent {
    PushEvent::Assistant {
        content: content.to_string(),
    }
}

fn is_ignored(event: &PushEvent) -> bool {
    matches!(event, PushEvent::Ignored { .. })
}

#[test]
fn open_carries_client_id() {
    assert_eq!(
        decode_push_event("open", r#"{"client_id":"abc-123"}"#),
        PushEvent::Open {
            client_id: "abc-123".to_string()
        }
    );
}

#[test]
fn open_without_client_id_is_ignored() {
    assert_eq!(
        decode_push_event("open", "{}"),
        PushEvent::Ignored {
            event: "open".to_string(),
            reason: IgnoreReason::MissingField("client_id"),
        }
    );
    assert!(is_ignored(&decode_push_event("open", "not json")));
    assert!(is_ignored(&decode_push_event("open", r#"{"client_id":null}"#)));
}

#[test]
fn progress_fraction_becomes_rounded_percent() {
    let cases = [
        (r#"{"progress":0.5}"#, 50),
        (r#"{"progress":0}"#, 0),
        (r#"{"progress":1}"#, 100),
        (r#"{"progress":0.123}"#, 12),
        (r#"{"progress":0.127}"#, 13),
        (r#"{"progress":1.7}"#, 170),
        (r#"{"progress":-0.25}"#, -25),
    ];
    for (payload, expected) in cases {
        assert_eq!(decode_push_event("progress", payload), progress(expected), "{payload}");
    }
}

#[test]
fn progress_matches_round_of_scaled_value() {
    for step in 0..=45 {
        let value = f64::from(step) * 0.0137;
        let payload = format!(r#"{{"progress":{value}}}"#);
        let expected = (value * 100.0).round() as i64;
        assert_eq!(decode_push_event("progress", &payload), progress(expected));
    }
}

#[test]
fn progress_accepts_numeric_strings_and_nested_params() {
    assert_eq!(
        decode_push_event("progress", r#"{"progress":"0.42"}"#),
        progress(42)
    );
    assert_eq!(
        decode_push_event("progress", r#"{"params":{"progress":0.8}}"#),
        progress(80)
    );
    assert_eq!(
        decode_push_event("progress", r#"{"params":{"progress":" 0.3 "}}"#),
        progress(30)
    );
    assert_eq!(
        decode_push_event("progress", r#"{"progress":0.1,"params":{"progress":0.9}}"#),
        progress(10)
    );
}

#[test]
fn unusable_progress_is_ignored() {
    let payloads = [
        r#"{"progress":"abc"}"#,
        r#"{"progress":""}"#,
        r#"{"progress":"NaN"}"#,
        r#"{"progress":"inf"}"#,
        r#"{"progress":true}"#,
        r#"{"progress":[0.5]}"#,
        r#"{"params":{}}"#,
        r#"{}"#,
        "0.5",
        "{broken",
    ];
    for payload in payloads {
        assert!(
            is_ignored(&decode_push_event("progress", payload)),
            "expected {payload} to be ignored"
        );
    }
}

#[test]
fn assistant_joins_text_parts() {
    let payload = r#"{"params":{"level":"info","data":[
        {"type":"text","text":"Hello"},
        {"type":"image","text":"skip me"},
        {"type":"text","text":"world "}
    ]}}"#;
    assert_eq!(decode_push_event("assistant", payload), assistant("Hello world"));
}

#[test]
fn assistant_without_text_parts_uses_placeholder() {
    let payloads = [
        r#"{"params":{"data":[]}}"#,
        r#"{"params":{"data":[{"type":"image","url":"x.png"}]}}"#,
        r#"{"params":{"data":[{"type":"text","text":"   "}]}}"#,
        r#"{"params":{}}"#,
        r#"{"params":{"data":null}}"#,
        r#"{"params":{"data":[{"type":"text","text":7}, null, "loose"]}}"#,
        "null",
        "42",
        r#""just a string""#,
        "[]",
    ];
    for payload in payloads {
        assert_eq!(
            decode_push_event("assistant", payload),
            assistant(EMPTY_ASSISTANT_TEXT),
            "{payload}"
        );
    }
}

#[test]
fn assistant_level_sets_prefix() {
    assert_eq!(
        decode_push_event(
            "assistant",
            r#"{"params":{"level":"error","data":[{"type":"text","text":"boom"}]}}"#
        ),
        assistant("❌ boom")
    );
    assert_eq!(
        decode_push_event(
            "assistant",
            r#"{"params":{"level":"warn","data":[{"type":"text","text":"careful"}]}}"#
        ),
        assistant("⚠️ careful")
    );
    assert_eq!(
        decode_push_event("assistant", r#"{"params":{"level":"error","data":[]}}"#),
        assistant("❌ (message)")
    );
    assert_eq!(
        decode_push_event("assistant", r#"{"params":{"level":"warn"}}"#),
        assistant("⚠️ (message)")
    );
}

#[test]
fn assistant_keeps_only_string_text() {
    let payload = r#"{"params":{"data":[
        {"type":"text","text":12},
        {"type":"text","text":"kept"},
        {"type":"text","text":{"nested":true}}
    ]}}"#;
    assert_eq!(decode_push_event("assistant", payload), assistant("kept"));
}

#[test]
fn malformed_assistant_is_ignored() {
    assert!(is_ignored(&decode_push_event("assistant", "<html>")));
    assert_eq!(
        decode_push_event("assistant", r#"{"params":{"data":"text"}}"#),
        PushEvent::Ignored {
            event: "assistant".to_string(),
            reason: IgnoreReason::UnexpectedShape("params.data"),
        }
    );
}

#[test]
fn unknown_and_generic_events_are_ignored() {
    for name in ["message", "heartbeat", ""] {
        assert_eq!(
            decode_push_event(name, r#"{"anything":1}"#),
            PushEvent::Ignored {
                event: name.to_string(),
                reason: IgnoreReason::UnknownEvent,
            }
        );
    }
}
