//! In-process stand-in for a WebDriver endpoint
//!
//! Answers the commands this crate issues with canned W3C responses and
//! records every call as `"METHOD /path"`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::session::ELEMENT_KEY;

pub const SESSION_ID: &str = "mock-session";
pub const ELEMENT_ID: &str = "el-1";
pub const OPTION_ID: &str = "opt-1";
pub const INNER_HTML: &str = "<table><tbody></tbody></table>";

/// Behaviour of a [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Returned for every property read
    pub inner_html: String,
    /// Element lookups whose XPath contains this text fail with "no such element"
    pub missing_marker: String,
    /// How long `POST /session` stalls before answering
    pub session_delay: Duration,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            inner_html: INNER_HTML.to_string(),
            missing_marker: "missing".to_string(),
            session_delay: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
struct Recorder {
    options: Arc<MockOptions>,
    calls: Arc<Mutex<Vec<String>>>,
    session_request: Arc<Mutex<Option<Value>>>,
}

pub struct MockDriver {
    addr: SocketAddr,
    recorder: Recorder,
}

impl MockDriver {
    pub async fn start() -> Self {
        Self::start_with(MockOptions::default()).await
    }

    pub async fn start_with(options: MockOptions) -> Self {
        let recorder = Recorder {
            options: Arc::new(options),
            calls: Arc::new(Mutex::new(Vec::new())),
            session_request: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .fallback(handle)
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock driver");
        let addr = listener.local_addr().expect("mock driver address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, recorder }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls.lock().expect("calls lock").clone()
    }

    pub fn last_session_request(&self) -> Option<Value> {
        self.recorder
            .session_request
            .lock()
            .expect("session lock")
            .clone()
    }
}

async fn handle(State(rec): State<Recorder>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    rec.calls
        .lock()
        .expect("calls lock")
        .push(format!("{} {}", method, path));

    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["status"]) => ok(json!({ "ready": true, "message": "ready" })),
        ("POST", ["session"]) => {
            *rec.session_request.lock().expect("session lock") = Some(body);
            if !rec.options.session_delay.is_zero() {
                tokio::time::sleep(rec.options.session_delay).await;
            }
            ok(json!({ "sessionId": SESSION_ID, "capabilities": {} }))
        }
        ("POST", ["session", _, "element"]) => {
            let xpath = body["value"].as_str().unwrap_or_default();
            if xpath.contains(rec.options.missing_marker.as_str()) {
                return error(StatusCode::NOT_FOUND, "no such element", "Unable to locate element");
            }
            ok(json!({ ELEMENT_KEY: ELEMENT_ID }))
        }
        ("POST", ["session", _, "element", _, "element"]) => ok(json!({ ELEMENT_KEY: OPTION_ID })),
        ("GET", ["session", _, "element", _, "property", _]) => {
            ok(json!(rec.options.inner_html))
        }
        ("DELETE", ["session", _]) | ("POST", ["session", _, ..]) => ok(Value::Null),
        _ => error(StatusCode::NOT_FOUND, "unknown command", "unknown command"),
    }
}

fn ok(value: Value) -> Response {
    Json(json!({ "value": value })).into_response()
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "value": { "error": code, "message": message, "stacktrace": "" } })),
    )
        .into_response()
}
