//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: The store is reachable
/// - **503 Service Unavailable**: The store is unreachable
///
/// The cache is reported but does not affect the status code: counts are still
/// served from the store while it is down.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "mode": "normal",
///   "checks": {
///     "store": { "status": "ok" },
///     "cache": { "status": "ok" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check(state.store.health_check().await, "Store unreachable");
    let cache_check = check(state.cache.health_check().await, "Cache unreachable");

    let store_healthy = store_check.status == "ok";
    let status = match (store_healthy, cache_check.status == "ok") {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: if state.dev_mode { "dev" } else { "normal" }.to_string(),
        checks: HealthChecks {
            store: store_check,
            cache: cache_check,
        },
    };

    if store_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check(healthy: bool, failure: &str) -> CheckStatus {
    if healthy {
        CheckStatus {
            status: "ok".to_string(),
            message: None,
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some(failure.to_string()),
        }
    }
}
