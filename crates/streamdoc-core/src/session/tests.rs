//! Tests for the session controller

use super::*;
use crate::document::Segment;
use crate::error::StreamDocError;
use crate::event::{ToolPayload, ToolStatus};
use crate::render::{
    MemoryChartRenderer, MemoryPresenter, TOOL_RUNNING_TEXT, TOOL_UNMATCHED_TEXT,
};
use crate::transport::{ChannelTransport, StreamSender};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

type TestSession = ChatSession<Arc<ChannelTransport>, MemoryPresenter, MemoryChartRenderer>;

fn new_session() -> (Arc<TestSession>, Arc<ChannelTransport>) {
    let transport = Arc::new(ChannelTransport::new());
    let session = Arc::new(ChatSession::new(
        Arc::clone(&transport),
        MemoryPresenter::new(),
        MemoryChartRenderer,
    ));
    (session, transport)
}

fn frame(payload: serde_json::Value) -> String {
    format!("data: {}\n\n", payload)
}

fn token(text: &str) -> String {
    frame(json!({"type": "token", "text": text}))
}

fn send_all(sender: &StreamSender, frames: &[String]) {
    for f in frames {
        assert!(sender.send(f.clone()));
    }
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_hello_world_scenario() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(
        &sender,
        &[
            token("Hello "),
            token("world"),
            frame(json!({"type": "tool", "name": "db_query", "status": "running", "data": {}})),
            frame(json!({"type": "done"})),
        ],
    );
    drop(sender);

    let end = session.start(ChatRequest::new("hi")).await.unwrap();
    let summary = end.summary().unwrap();
    assert_eq!(summary.frames, 4);
    assert_eq!(summary.ignored_frames, 0);
    assert_eq!(summary.segments, 2);
    assert_eq!(summary.slots, 1);
    assert!(summary.saw_done);
    assert_eq!(summary.renders.rendered, 1);

    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.segments(),
        &[
            Segment::text("Hello world"),
            Segment::slot(0, ToolPayload::new("db_query", ToolStatus::Running, json!({}))),
        ]
    );
    session.with_presenter(|presenter| {
        assert_eq!(
            presenter.mount(0).unwrap().text.as_deref(),
            Some(TOOL_RUNNING_TEXT)
        );
    });
    assert_eq!(transport.requests(), vec![ChatRequest::new("hi")]);
}

#[tokio::test]
async fn test_tool_without_status_gets_unmatched_slot() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(
        &sender,
        &[
            frame(json!({"type": "tool", "name": "db_query", "data": {}})),
            frame(json!({"type": "tool", "name": "db_query", "status": null})),
        ],
    );
    drop(sender);

    let end = session.start(ChatRequest::new("q")).await.unwrap();
    let summary = end.summary().unwrap();
    assert_eq!(summary.ignored_frames, 0);
    assert_eq!(summary.slots, 2);
    session.with_presenter(|presenter| {
        for slot_id in 0..2 {
            assert_eq!(
                presenter.mount(slot_id).unwrap().text.as_deref(),
                Some(TOOL_UNMATCHED_TEXT)
            );
        }
    });
}

#[tokio::test]
async fn test_malformed_frame_between_tokens() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(
        &sender,
        &[token("a"), "data: not-json\n\n".to_string(), token("b")],
    );
    drop(sender);

    let end = session.start(ChatRequest::new("q")).await.unwrap();
    let summary = end.summary().unwrap();
    assert_eq!(summary.ignored_frames, 1);
    assert_eq!(summary.slots, 0);
    assert_eq!(session.snapshot().segments(), &[Segment::text("ab")]);
}

#[tokio::test]
async fn test_byte_fragmented_stream_gives_same_document() {
    let text = [
        token("销售"),
        token("额 📊"),
        frame(json!({
            "type": "tool", "name": "db_query", "status": "success",
            "data": {"chart": {"type": "echarts", "option": {"series": [{"type": "bar"}]}}}
        })),
        token("完成"),
    ]
    .concat();

    let (whole, whole_transport) = new_session();
    let sender = whole_transport.prepare_stream();
    sender.send(text.clone());
    drop(sender);
    whole.start(ChatRequest::new("q")).await.unwrap();

    let (split, split_transport) = new_session();
    let sender = split_transport.prepare_stream();
    for byte in text.as_bytes() {
        sender.send(vec![*byte]);
    }
    drop(sender);
    split.start(ChatRequest::new("q")).await.unwrap();

    assert_eq!(whole.snapshot().segments(), split.snapshot().segments());
    assert_eq!(split.snapshot().len(), 3);
    split.with_presenter(|presenter| {
        assert_eq!(
            presenter.mount(0).unwrap().chart,
            Some(json!({"series": [{"type": "bar"}]}))
        );
    });
}

#[tokio::test]
async fn test_done_does_not_end_read_loop() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(&sender, &[token("x"), frame(json!({"type": "done"})), token("y")]);
    drop(sender);

    let end = session.start(ChatRequest::new("q")).await.unwrap();
    assert!(end.summary().unwrap().saw_done);
    assert_eq!(session.snapshot().segments(), &[Segment::text("xy")]);
}

#[tokio::test]
async fn test_transport_failure_keeps_partial_document() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(
        &sender,
        &[
            token("partial"),
            frame(json!({"type": "tool", "name": "html_validate", "status": "running"})),
        ],
    );
    sender.fail(StreamDocError::transport("connection reset"));

    let err = session.start(ChatRequest::new("q")).await.unwrap_err();
    assert!(matches!(err, StreamDocError::Transport { .. }));
    assert_eq!(session.snapshot().len(), 2);
    assert_eq!(session.snapshot().plain_text(), "partial");
}

#[tokio::test]
async fn test_open_failure_is_session_error() {
    let (session, _transport) = new_session();
    let err = session.start(ChatRequest::new("q")).await.unwrap_err();
    assert!(matches!(err, StreamDocError::Transport { .. }));
    assert!(session.snapshot().is_empty());
}

#[tokio::test]
async fn test_new_session_resets_state() {
    let (session, transport) = new_session();

    let first = transport.prepare_stream();
    send_all(
        &first,
        &[
            token("one"),
            frame(json!({"type": "tool", "name": "db_query", "status": "running"})),
        ],
    );
    drop(first);
    session.start(ChatRequest::new("1")).await.unwrap();
    assert_eq!(session.snapshot().len(), 2);

    let second = transport.prepare_stream();
    send_all(
        &second,
        &[frame(json!({"type": "tool", "name": "html_validate", "status": "error"}))],
    );
    drop(second);
    let end = session.start(ChatRequest::new("2")).await.unwrap();

    assert_eq!(end.summary().unwrap().slots, 1);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.slots().next().unwrap().slot_id, 0);
    session.with_presenter(|presenter| {
        assert_eq!(presenter.mounts().len(), 1);
        assert_eq!(presenter.mount(0).unwrap().renders, 1);
    });
}

#[tokio::test]
async fn test_new_session_discards_old_events() {
    let (session, transport) = new_session();

    let old = transport.prepare_stream();
    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.start(ChatRequest::new("first")).await }
    });
    old.send(token("old "));
    wait_for(|| session.snapshot().len() == 1).await;

    let new = transport.prepare_stream();
    let second = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.start(ChatRequest::new("second")).await }
    });
    wait_for(|| transport.requests().len() == 2).await;

    old.send(token("stale"));
    old.send(frame(json!({"type": "tool", "name": "db_query", "status": "running"})));
    drop(old);
    assert!(first.await.unwrap().unwrap().is_superseded());

    new.send(token("fresh"));
    drop(new);
    let end = second.await.unwrap().unwrap();

    assert_eq!(end.summary().unwrap().frames, 1);
    assert_eq!(session.snapshot().segments(), &[Segment::text("fresh")]);
}

#[tokio::test]
async fn test_cancel_abandons_session_but_keeps_document() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    let task = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.start(ChatRequest::new("q")).await }
    });

    sender.send(token("kept"));
    wait_for(|| session.snapshot().len() == 1).await;

    let token_handle = session.cancellation_token();
    session.cancel();
    assert!(token_handle.is_cancelled());
    assert!(task.await.unwrap().unwrap().is_superseded());

    sender.send(token(" ignored"));
    assert_eq!(session.snapshot().segments(), &[Segment::text("kept")]);
}

#[tokio::test]
async fn test_unterminated_trailing_frame_is_reported() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    sender.send(token("a"));
    sender.send("data: {\"type\":\"token\",\"text\":\"b\"}");
    drop(sender);

    let end = session.start(ChatRequest::new("q")).await.unwrap();
    assert_eq!(end.summary().unwrap().trailing_bytes, 33);
    assert_eq!(session.snapshot().plain_text(), "a");
}

#[tokio::test]
async fn test_commit_precedes_every_render_pass() {
    let (session, transport) = new_session();
    let sender = transport.prepare_stream();
    send_all(
        &sender,
        &[
            token("a"),
            token("b"),
            frame(json!({"type": "tool", "name": "db_query", "status": "running"})),
            frame(json!({"type": "done"})),
        ],
    );
    drop(sender);
    session.start(ChatRequest::new("q")).await.unwrap();

    // One commit for the reset plus one per mutating event.
    session.with_presenter(|presenter| assert_eq!(presenter.commits(), 4));
}
