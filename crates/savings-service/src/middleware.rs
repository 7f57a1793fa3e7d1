//! Readiness gate for the data endpoints.
//!
//! Requests that reach the data endpoints before the dataset store is ready
//! are rejected with 503. `/api/health` is always let through so probes can
//! watch the store come up.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::AppError;
use crate::state::AppState;

/// Paths served regardless of dataset readiness.
const UNGATED_PATHS: &[&str] = &["/api/health"];

/// Reject requests until the dataset store is ready.
pub async fn require_ready(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.store.is_ready() || UNGATED_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let phase = state.store.phase();
    warn!(
        "Rejecting {} {} while dataset is {}",
        request.method(),
        request.uri().path(),
        phase
    );

    AppError::unavailable(phase).into_response()
}
