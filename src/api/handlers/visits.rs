//! Handlers for recording visits and reporting the count.

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Records a visit from the caller.
///
/// # Endpoint
///
/// `GET /ping`
///
/// # Response
///
/// `200 OK` with body `pong` once the visit is stored. The cached counter is updated
/// on a best-effort basis and never fails the request.
///
/// # Errors
///
/// Returns 500 Internal Server Error if the visit could not be stored.
pub async fn ping_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<&'static str, AppError> {
    let ip = client_ip(&headers, addr, state.behind_proxy);

    state.visits.record_visit(&ip).await?;

    Ok("pong")
}

/// Reports the number of recorded visits as plain text.
///
/// # Endpoint
///
/// `GET /visits`
///
/// # Response
///
/// `200 OK` with the count as the body, e.g. `42`. In dev mode the body is `-1`.
///
/// # Errors
///
/// Returns 500 Internal Server Error if the count could not be read from the store
/// after a cache miss.
pub async fn visits_handler(State(state): State<AppState>) -> Result<String, AppError> {
    let count = state.visits.visits_count().await?;

    Ok(count.to_string())
}
