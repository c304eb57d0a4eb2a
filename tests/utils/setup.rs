use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use roomcall::{routes, AppState, HttpRtcPlatform, InMemoryRoomRepository, UuidTagGenerator};

use super::fake_vendor::FakeVendor;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub vendor: FakeVendor,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with_static_dir("public").await
    }

    pub async fn start_with_static_dir(static_dir: &str) -> Self {
        let vendor = FakeVendor::start().await;
        let platform = Arc::new(HttpRtcPlatform::new(
            vendor.base_url.clone(),
            FakeVendor::credentials(),
        ));
        let state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            platform,
            Arc::new(UuidTagGenerator::new()),
        );

        Self {
            router: routes::app(state, static_dir),
            vendor,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    pub async fn join_call(&self, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/joinCall")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn end_session(&self, room_name: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(format!("/endSession?room_name={}", room_name))
            .body(Body::empty())
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}
