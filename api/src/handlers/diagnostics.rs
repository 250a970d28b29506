//! Operational endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::app::Diagnostics;
use crate::domain::ports::FeedRepository;
use crate::AppState;

/// GET /diagnostics
pub async fn get_diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    Json(Diagnostics::collect(&state.config, &state.registry))
}

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.feeds.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "DB Error")
        }
    }
}
