use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, instrument};

use super::{
    service::CallService,
    types::{
        EndSessionQuery, EndSessionResponse, JoinCallRequest, JoinCallResponse,
        END_FAILED_MESSAGE, JOIN_FAILED_MESSAGE,
    },
};
use crate::shared::{ApiFailure, AppError, AppState};

fn call_service(state: &AppState) -> CallService {
    CallService::new(
        state.room_registry.clone(),
        state.rtc_platform.clone(),
        state.tag_generator.clone(),
    )
}

/// HTTP handler for joining a call
///
/// POST /joinCall
/// Returns a participant token and the room the participant was placed in
#[instrument(name = "join_call", skip(state, payload))]
pub async fn join_call(
    State(state): State<AppState>,
    payload: Result<Json<JoinCallRequest>, JsonRejection>,
) -> Result<Json<JoinCallResponse>, ApiFailure> {
    let Json(request) = payload.map_err(|rejection| {
        let e = AppError::Validation(rejection.body_text());
        info!(error = %e, "Rejected join request");
        ApiFailure::from_error(&e, JOIN_FAILED_MESSAGE)
    })?;
    info!(request = ?request, "About to set up browser client");

    let joined = call_service(&state)
        .join_call(&request)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to start the browser call");
            ApiFailure::from_error(&e, JOIN_FAILED_MESSAGE)
        })?;

    Ok(Json(JoinCallResponse {
        message: "created participant and set up session".to_string(),
        token: joined.token,
        room: joined.room,
    }))
}

/// HTTP handler for ending a room's session
///
/// GET /endSession?room_name=<name>
#[instrument(name = "end_session", skip(state))]
pub async fn end_session(
    State(state): State<AppState>,
    Query(query): Query<EndSessionQuery>,
) -> Result<Json<EndSessionResponse>, ApiFailure> {
    let room_name = query.room_name.unwrap_or_default();
    info!(room = %room_name, "About to end a session");

    let ended = call_service(&state)
        .end_session(&room_name)
        .await
        .map_err(|e| {
            error!(room = %room_name, error = %e, "Failed to end the room/session");
            ApiFailure::from_error(&e, END_FAILED_MESSAGE)
        })?;

    Ok(Json(EndSessionResponse {
        status: StatusCode::OK.as_u16(),
        message: format!("room/session '{}' deleted", ended.room.name),
        removed: ended.removed,
        failed: ended.failed,
    }))
}
