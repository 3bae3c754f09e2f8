//! Visit route configuration.

use crate::api::handlers::{ping_handler, visits_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Visit routes.
///
/// # Endpoints
///
/// - `GET /ping`   - Record a visit, responds `pong`
/// - `GET /visits` - Current visit count as plain text
pub fn visit_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/visits", get(visits_handler))
}
