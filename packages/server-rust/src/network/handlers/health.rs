//! Health, liveness, and readiness endpoint handlers.
//!
//! These handlers expose server health information for orchestrators
//! (Kubernetes, load balancers) and operational monitoring.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Returns detailed health information as JSON.
///
/// Always returns 200 -- the `state` field in the response body indicates
/// whether the server is actually healthy.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "state": state.shutdown.health_state().as_str(),
        "in_flight": state.shutdown.in_flight_count(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness check -- always returns 200 OK.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness check -- returns 200 when ready, 503 otherwise.
///
/// Returns 503 during startup (before `set_ready()` is called) and once
/// shutdown has begun, so no new traffic is routed here.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
