mod support;

use std::sync::Arc;
use std::time::Duration;

use agent_chat_core::SessionId;
use agent_chat_engine::{EngineEvent, EngineHandle, FailureKind, PushEvent};
use support::ScriptedTransport;

const WAIT: Duration = Duration::from_secs(5);

fn engine(scripts: Vec<Vec<&'static [u8]>>) -> EngineHandle {
    EngineHandle::with_transport(
        Arc::new(ScriptedTransport::new(scripts)),
        Duration::from_secs(60),
    )
    .expect("engine")
}

#[test]
fn submitted_turn_completes_with_reply() {
    let engine = engine(Vec::new());
    engine.submit_turn(4, SessionId::from("s"), "hello", Some("c-1".to_string()));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::TurnCompleted { turn_id, result }) => {
            assert_eq!(turn_id, 4);
            assert_eq!(result.expect("reply").reply, "echo hello from c-1");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failed_turn_reports_transport_error() {
    let engine = engine(Vec::new());
    engine.submit_turn(1, SessionId::from("s"), "fail", None);

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::TurnCompleted { turn_id, result }) => {
            assert_eq!(turn_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(502));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn opened_channel_forwards_push_events() {
    let engine = engine(vec![vec![
        b"event: open\ndata: {\"client_id\":\"c-2\"}\n\nevent: progress\ndata: {\"progress\":0.9}\n\n",
    ]]);
    engine.open_channel(SessionId::from("s"));

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::Push(PushEvent::Open {
            client_id: "c-2".to_string()
        }))
    );
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::Push(PushEvent::Progress { percent: 90 }))
    );
    engine.close_channel();
    assert_eq!(engine.try_recv(), None);
}
