use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::call::TagGenerator;
use crate::room::{RoomRegistry, RoomRepository};
use crate::rtc::{RtcError, RtcPlatform};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_registry: Arc<RoomRegistry>,
    pub rtc_platform: Arc<dyn RtcPlatform>,
    pub tag_generator: Arc<dyn TagGenerator>,
}

impl AppState {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        rtc_platform: Arc<dyn RtcPlatform>,
        tag_generator: Arc<dyn TagGenerator>,
    ) -> Self {
        let room_registry = Arc::new(RoomRegistry::new(room_repository, rtc_platform.clone()));

        Self {
            room_registry,
            rtc_platform,
            tag_generator,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] RtcError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure returned to HTTP callers.
///
/// Carries only a caller-safe message; the underlying error is logged where
/// the failure is produced.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Maps an error to what the caller sees. Validation problems are echoed
    /// back; anything else collapses to `internal_message`.
    pub fn from_error(error: &AppError, internal_message: &str) -> Self {
        match error {
            AppError::Validation(msg) => Self::bad_request(format!("invalid request body: {}", msg)),
            _ => Self::internal(internal_message),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message
        }));

        (self.status, body).into_response()
    }
}
