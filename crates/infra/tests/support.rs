//! Shared helpers for glide-infra integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use glide_infra::{ConcourseClient, EnvSource, HttpClientBuilder};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "integration-token";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";

/// Install a test subscriber once so `RUST_LOG=debug` shows client logs.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Mock Concourse server with a working token endpoint.
pub async fn start_server() -> MockServer {
    init_tracing();
    let server = MockServer::start().await;
    mount_token(&server, 3600).await;
    server
}

pub async fn mount_token(server: &MockServer, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path("/sky/issuer/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "expires_in": expires_in
        })))
        .named("token endpoint")
        .mount(server)
        .await;
}

pub fn http_client() -> reqwest::Client {
    HttpClientBuilder::default().no_proxy().build().unwrap()
}

/// Client with explicit settings pointing at `server` and an empty
/// environment.
pub fn client_for(server: &MockServer) -> ConcourseClient {
    ConcourseClient::builder()
        .url(server.uri())
        .username(USERNAME)
        .password(PASSWORD)
        .http_client(http_client())
        .env_source(Arc::new(CountingEnv::default()))
        .build()
        .unwrap()
}

/// Environment backed by a map that counts every lookup.
#[derive(Default)]
pub struct CountingEnv {
    values: HashMap<String, String>,
    lookups: AtomicUsize,
}

impl CountingEnv {
    pub fn with(values: &[(&str, &str)]) -> Self {
        Self {
            values: values.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl EnvSource for CountingEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.values.get(key).cloned()
    }
}

/// Server-sent event body from `(name, data)` pairs.
pub fn sse_body(events: &[(&str, &str)]) -> String {
    events.iter().map(|(name, data)| format!("event: {name}\ndata: {data}\n\n")).collect()
}

pub fn sse_response(events: &[(&str, &str)]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(sse_body(events), "text/event-stream")
}

/// JSON payload of a log event.
pub fn log_payload(text: &str) -> String {
    json!({
        "event": "log",
        "version": "5.1",
        "data": {
            "payload": text,
            "time": 1_700_000_000,
            "origin": { "id": "step-1", "source": "stdout" }
        }
    })
    .to_string()
}
