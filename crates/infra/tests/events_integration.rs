//! Integration tests for build event streaming
//!
//! Serves server-sent event bodies from wiremock and consumes them through
//! `ConcourseClient::build_events`.

mod support;

use std::time::Duration;

use glide_domain::{BuildEvent, BuildEventKind, GlideError};
use glide_infra::api::BuildEventStream;
use serde_json::json;
use support::{client_for, log_payload, sse_response, start_server, TOKEN};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn collect(mut events: BuildEventStream) -> Vec<BuildEvent> {
    let mut out = Vec::new();
    while let Some(event) = events.recv().await {
        out.push(event);
    }
    out
}

/// Validates that `[A, B, end]` yields exactly `[A, B]` and then closes.
#[tokio::test]
async fn test_stream_stops_at_end_event() {
    let server = start_server().await;
    let a = log_payload("A");
    let b = log_payload("B");
    let late = log_payload("after end");
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/42/events"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(sse_response(&[
            ("event", a.as_str()),
            ("event", b.as_str()),
            ("end", ""),
            ("event", late.as_str()),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let events = client.build_events(42, CancellationToken::new()).await.unwrap();
    let received = collect(events).await;

    let payloads: Vec<_> = received.iter().map(|e| e.data.payload.as_str()).collect();
    assert_eq!(payloads, vec!["A", "B"]);
    assert_eq!(received[0].kind(), BuildEventKind::Log);
    assert_eq!(received[0].data.origin_id(), Some("step-1"));
    assert_eq!(received[0].data.timestamp().unwrap().timestamp(), 1_700_000_000);
}

/// Validates that a malformed payload is skipped and later events arrive.
#[tokio::test]
async fn test_malformed_event_is_skipped() {
    let server = start_server().await;
    let a = log_payload("A");
    let b = log_payload("B");
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/7/events"))
        .respond_with(sse_response(&[
            ("event", a.as_str()),
            ("event", "{this is not json"),
            ("event", "[]"),
            ("event", b.as_str()),
            ("end", ""),
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let received = collect(client.build_events(7, CancellationToken::new()).await.unwrap()).await;

    let payloads: Vec<_> = received.iter().map(|e| e.data.payload.as_str()).collect();
    assert_eq!(payloads, vec!["A", "B"]);
}

/// Validates status and error events decode alongside log events.
#[tokio::test]
async fn test_status_and_error_events() {
    let server = start_server().await;
    let status = json!({ "event": "status", "data": { "status": "succeeded", "time": 5 } })
        .to_string();
    let error = json!({ "event": "error", "data": { "message": "disk full" } }).to_string();
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/9/events"))
        .respond_with(sse_response(&[
            ("event", error.as_str()),
            ("event", status.as_str()),
            ("end", ""),
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let received = collect(client.build_events(9, CancellationToken::new()).await.unwrap()).await;

    assert_eq!(received.len(), 2);
    assert_eq!(received[0].kind(), BuildEventKind::Error);
    assert_eq!(received[0].data.message, "disk full");
    assert_eq!(received[1].kind(), BuildEventKind::Status);
    assert_eq!(received[1].data.status.as_deref(), Some("succeeded"));
}

/// Validates that a stream without an end event still closes cleanly.
#[tokio::test]
async fn test_stream_closes_when_body_ends() {
    let server = start_server().await;
    let a = log_payload("A");
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/3/events"))
        .respond_with(sse_response(&[("event", a.as_str())]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let received = collect(client.build_events(3, CancellationToken::new()).await.unwrap()).await;

    assert_eq!(received.len(), 1);
}

/// Validates that a non-200 open returns an HTTP error and no channel.
#[tokio::test]
async fn test_missing_build_is_http_error() {
    let server = start_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/404/events"))
        .respond_with(ResponseTemplate::new(404).set_body_string("build not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.build_events(404, CancellationToken::new()).await.unwrap_err();

    match err {
        GlideError::Http(http) => {
            assert_eq!(http.status, 404);
            assert!(http.body.is_empty());
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

/// Validates that an already cancelled token fails the open without
/// sending the request.
#[tokio::test]
async fn test_cancelled_before_open() {
    let server = start_server().await;
    let a = log_payload("A");
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/5/events"))
        .respond_with(sse_response(&[("event", a.as_str()), ("end", "")]))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = client_for(&server);
    let err = client.build_events(5, cancel).await.unwrap_err();

    assert_eq!(err.label(), "network");
}

/// Validates that cancelling while the server has not answered aborts the
/// open with an error.
#[tokio::test]
async fn test_cancelled_while_opening() {
    let server = start_server().await;
    let a = log_payload("A");
    Mock::given(method("GET"))
        .and(path("/api/v1/builds/6/events"))
        .respond_with(sse_response(&[("event", a.as_str())]).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let client = client_for(&server);
    let result = tokio::time::timeout(Duration::from_secs(5), client.build_events(6, cancel))
        .await
        .expect("open should be aborted by cancellation");

    assert_eq!(result.unwrap_err().label(), "network");
}
