//! Visit entity representing a single recorded request.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A visit recorded by the event store.
///
/// Visits are immutable once written. The identifier and timestamp are assigned by the
/// store; only the origin address comes from the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub id: i64,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(id: i64, ip_address: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            ip_address,
            created_at,
        }
    }
}
