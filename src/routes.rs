use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{call, shared::AppState};

/// API routes, without state or static assets
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/joinCall", post(call::join_call))
        .route("/endSession", get(call::end_session))
}

/// Full application: API routes, static assets as fallback, request tracing
pub fn app(state: AppState, static_dir: &str) -> Router {
    api_router()
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
