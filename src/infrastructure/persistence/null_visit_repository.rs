//! No-op visit store for dev mode.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::Visit;
use crate::domain::repositories::VisitRepository;
use crate::error::StoreError;

/// A store that accepts every write and persists nothing.
///
/// Selected once at startup when `DEV_MODE` is enabled; counts are always zero.
pub struct NullVisitRepository;

impl NullVisitRepository {
    /// Creates a new NullVisitRepository instance.
    pub fn new() -> Self {
        debug!("Using NullVisitRepository (persistence disabled)");
        Self
    }
}

impl Default for NullVisitRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisitRepository for NullVisitRepository {
    async fn create(&self, ip_address: &str) -> Result<(), StoreError> {
        debug!("Dropping visit from {} (dev mode)", ip_address);
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(0)
    }

    async fn recent(&self, _limit: i64) -> Result<Vec<Visit>, StoreError> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
