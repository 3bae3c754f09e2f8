//! Error types shared across layers.
//!
//! - [`StoreError`] - failures of the durable visit store
//! - [`AppError`] - caller-visible failures, rendered as HTTP responses
//!
//! Cache faults have their own type ([`crate::infrastructure::cache::CacheError`]) and
//! never reach [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
}

/// Failures reported by a [`crate::domain::repositories::VisitRepository`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (connection loss, pool exhaustion, timeout).
    #[error("visit store unavailable: {0}")]
    Unavailable(String),

    /// Appending a visit record failed.
    #[error("failed to write visit: {0}")]
    WriteFailed(String),

    /// Aggregating or listing visit records failed.
    #[error("failed to read visits: {0}")]
    ReadFailed(String),
}

/// Which kind of store operation produced a [`sqlx::Error`].
#[derive(Debug, Clone, Copy)]
pub enum StoreOp {
    Write,
    Read,
}

impl StoreError {
    /// Classifies a sqlx error into a store failure.
    ///
    /// Connectivity problems map to [`StoreError::Unavailable`]; everything else maps to
    /// the write or read variant depending on `op`.
    pub fn from_sqlx(e: sqlx::Error, op: StoreOp) -> Self {
        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(e.to_string()),
            other => match op {
                StoreOp::Write => StoreError::WriteFailed(other.to_string()),
                StoreOp::Read => StoreError::ReadFailed(other.to_string()),
            },
        }
    }

    /// Returns true when the failure is a connectivity problem.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Caller-visible failures.
///
/// Only store faults become an `AppError`. Every variant renders as
/// `500 Internal Server Error` with a generic message; the underlying
/// [`StoreError`] is logged, not exposed.
#[derive(Debug, Error)]
pub enum AppError {
    /// The visit could not be durably recorded.
    #[error("failed to record visit")]
    WriteFailed(#[source] StoreError),

    /// The visit count could not be computed from the store.
    #[error("failed to get visits count")]
    ReadFailed(#[source] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::WriteFailed(e) | AppError::ReadFailed(e) => {
                tracing::error!(error = %e, "{}", self);
            }
        }

        let body = ErrorBody {
            error: ErrorInfo {
                code: "internal_error",
                message: self.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
