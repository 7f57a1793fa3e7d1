//! REST API endpoints for the savings-service.
//!
//! All handlers read from the shared [`DatasetStore`](savings_store::DatasetStore),
//! which is immutable once ready, so no locks are taken on the request path.
//!
//! ## Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]: missing or
//! malformed query parameters give 400, and requests made before the dataset
//! is loaded give 503.
//!
//! # Example
//!
//! ```ignore
//! use savings_service::{AppState, api};
//!
//! let app = api::app(state);
//! axum::serve(listener, app).await?;
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use savings_store::{SavingsQuery, StorePhase};
use savings_types::{SavingRecord, parse_datetime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::middleware::require_ready;
use crate::state::AppState;

/// Error body for a savings query missing any of its parameters.
pub const REQUIRED_PARAMS_MESSAGE: &str = "device_id, start_date, end_date are required";

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/devices", get(list_devices))
        .route("/api/savings", get(get_savings))
}

/// Build the full application: routes, readiness gate, tracing and CORS.
pub fn app(state: Arc<AppState>) -> Router {
    router()
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            require_ready,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub phase: StorePhase,
    pub version: &'static str,
    /// Number of device records, once ready.
    pub devices: Option<usize>,
    /// Number of savings records, once ready.
    pub savings: Option<usize>,
    pub uptime_seconds: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
///
/// Returns 200 once the dataset is ready and 503 before that.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let now = OffsetDateTime::now_utc();
    let dataset = state.store.dataset();

    let (code, status) = if dataset.is_some() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            phase: state.store.phase(),
            version: env!("CARGO_PKG_VERSION"),
            devices: dataset.map(|d| d.devices().len()),
            savings: dataset.map(|d| d.savings().len()),
            uptime_seconds: (now - state.started_at).whole_seconds().max(0),
            timestamp: now,
        }),
    )
}

/// List all devices, verbatim and in file order.
async fn list_devices(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let dataset = state
        .store
        .dataset()
        .ok_or_else(|| AppError::unavailable(state.store.phase()))?;
    Ok(Json(dataset.devices()).into_response())
}

/// Query parameters for the savings endpoint.
///
/// Every field is required; they are optional here so that absence can be
/// reported with a single error message.
#[derive(Debug, Deserialize, Default)]
pub struct SavingsParams {
    pub device_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated savings parameters: raw strings for echoing, parsed bounds for
/// filtering.
#[derive(Debug)]
pub struct ValidatedSavingsParams {
    pub device_id: String,
    pub start_date: String,
    pub end_date: String,
    pub query: SavingsQuery,
}

impl SavingsParams {
    /// Check presence of all three parameters and parse both dates.
    ///
    /// Empty values count as missing.
    pub fn validate(self) -> Result<ValidatedSavingsParams, AppError> {
        let (Some(device_id), Some(start_date), Some(end_date)) = (
            non_empty(self.device_id),
            non_empty(self.start_date),
            non_empty(self.end_date),
        ) else {
            return Err(AppError::BadRequest(REQUIRED_PARAMS_MESSAGE.to_string()));
        };

        let start = parse_datetime(&start_date)
            .map_err(|e| AppError::BadRequest(format!("start_date: {}", e)))?;
        let end = parse_datetime(&end_date)
            .map_err(|e| AppError::BadRequest(format!("end_date: {}", e)))?;

        Ok(ValidatedSavingsParams {
            query: SavingsQuery::new(device_id.as_str(), start, end),
            device_id,
            start_date,
            end_date,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Savings query response envelope.
#[derive(Debug, Serialize)]
pub struct SavingsResponse<'a> {
    pub device_id: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub count: usize,
    pub data: Vec<&'a SavingRecord>,
}

/// Get savings records for one device within an inclusive date range.
///
/// # Query Parameters
///
/// - `device_id`: exact, case-sensitive device id
/// - `start_date`: earliest timestamp, inclusive
/// - `end_date`: latest timestamp, inclusive
///
/// Dates accept RFC 3339, `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DD`
/// (midnight UTC).
///
/// # Errors
///
/// - Returns [`AppError::BadRequest`] if the query string is malformed, a
///   parameter is missing or empty, or a date cannot be parsed
/// - Returns [`AppError::Unavailable`] if the dataset is not loaded
async fn get_savings(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SavingsParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params?;
    let params = params.validate()?;

    let dataset = state
        .store
        .dataset()
        .ok_or_else(|| AppError::unavailable(state.store.phase()))?;

    let result = dataset.query_savings(&params.query);
    debug!(
        "GET /api/savings device_id={} start_date={} end_date={} -> {}",
        params.device_id, params.start_date, params.end_date, result.count
    );

    Ok(Json(SavingsResponse {
        device_id: &params.device_id,
        start_date: &params.start_date,
        end_date: &params.end_date,
        count: result.count,
        data: result.data,
    })
    .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unavailable(String),
}

impl AppError {
    pub(crate) fn unavailable(phase: StorePhase) -> Self {
        AppError::Unavailable(format!("dataset is not ready ({})", phase))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
