use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use roomcall::RtcCredentials;

// ============================================================================
// In-process fake of the communications platform REST API
// ============================================================================

pub const ACCOUNT_ID: &str = "9900000";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateSession,
    CreateParticipant,
    AddParticipant,
    RemoveParticipant,
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub operation: Operation,
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct FakeVendorState {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    failures: Arc<Mutex<HashSet<Operation>>>,
    next_id: Arc<AtomicUsize>,
}

impl FakeVendorState {
    /// Records the request; returns the failure response if the operation is set to fail
    fn record(
        &self,
        operation: Operation,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: &Bytes,
    ) -> Option<Response> {
        self.received.lock().unwrap().push(ReceivedRequest {
            operation,
            method,
            path: uri.path().to_string(),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_slice(body).ok(),
        });

        if self.failures.lock().unwrap().contains(&operation) {
            Some(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "simulated platform failure"})),
                )
                    .into_response(),
            )
        } else {
            None
        }
    }

    fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

async fn create_session(
    State(state): State<FakeVendorState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(failure) = state.record(Operation::CreateSession, method, &uri, &headers, &body) {
        return failure;
    }
    let request: Value = serde_json::from_slice(&body).unwrap_or_default();
    let tag = request["tag"].clone();
    Json(json!({
        "id": format!("session-{}", state.next_id()),
        "tag": tag,
    }))
    .into_response()
}

async fn create_participant(
    State(state): State<FakeVendorState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(failure) = state.record(Operation::CreateParticipant, method, &uri, &headers, &body)
    {
        return failure;
    }
    let request: Value = serde_json::from_slice(&body).unwrap_or_default();
    let tag = request["tag"].clone();
    let permissions = request["publishPermissions"].clone();
    let id = state.next_id();
    Json(json!({
        "participant": {
            "id": format!("participant-{}", id),
            "tag": tag,
            "publishPermissions": permissions,
        },
        "token": format!("token-{}", id),
    }))
    .into_response()
}

async fn add_participant(
    State(state): State<FakeVendorState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(failure) = state.record(Operation::AddParticipant, method, &uri, &headers, &body) {
        return failure;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn remove_participant(
    State(state): State<FakeVendorState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(failure) = state.record(Operation::RemoveParticipant, method, &uri, &headers, &body)
    {
        return failure;
    }
    StatusCode::NO_CONTENT.into_response()
}

pub struct FakeVendor {
    pub base_url: String,
    state: FakeVendorState,
    _server: JoinHandle<()>,
}

impl FakeVendor {
    pub async fn start() -> Self {
        let state = FakeVendorState::default();

        let app = Router::new()
            .route("/v1/accounts/:account_id/sessions", post(create_session))
            .route("/v1/accounts/:account_id/participants", post(create_participant))
            .route(
                "/v1/accounts/:account_id/sessions/:session_id/participants/:participant_id",
                put(add_participant).delete(remove_participant),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
            _server: server,
        }
    }

    pub fn credentials() -> RtcCredentials {
        RtcCredentials {
            account_id: ACCOUNT_ID.to_string(),
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        }
    }

    pub fn fail(&self, operation: Operation) {
        self.state.failures.lock().unwrap().insert(operation);
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }

    pub fn requests_for(&self, operation: Operation) -> Vec<ReceivedRequest> {
        self.received()
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect()
    }
}
