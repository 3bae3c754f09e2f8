//! Repository trait for the durable visit log.

use crate::domain::entities::Visit;
use crate::error::StoreError;
use async_trait::async_trait;

/// Repository interface for the visit event store.
///
/// The store is the ground truth for the visit count. Implementations must be safe
/// under concurrent writers and must not cache internally.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::NullVisitRepository`] - No-op store for dev mode
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends one visit with the given origin address.
    ///
    /// The identifier and timestamp are assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on connectivity loss or timeout.
    /// Returns [`StoreError::WriteFailed`] on other database errors. On error the
    /// caller must not assume the visit was persisted.
    async fn create(&self, ip_address: &str) -> Result<(), StoreError>;

    /// Returns the exact number of persisted visits.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on connectivity loss or timeout.
    /// Returns [`StoreError::ReadFailed`] on other database errors.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Returns the newest visits, most recent first.
    ///
    /// # Errors
    ///
    /// Same as [`VisitRepository::count`].
    async fn recent(&self, limit: i64) -> Result<Vec<Visit>, StoreError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
