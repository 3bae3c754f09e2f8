//! No-op cache implementation for dev mode or disabled caching.

use super::service::{CacheResult, CounterCache};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every read is a miss and every write succeeds without storing anything, so all
/// count queries go straight to the store.
///
/// # Use Cases
///
/// - Deployments without Redis
/// - Fallback when the Redis connection fails at startup
/// - Dev mode, together with [`crate::infrastructure::persistence::NullVisitRepository`]
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterCache for NullCache {
    async fn get(&self) -> CacheResult<Option<i64>> {
        Ok(None)
    }

    async fn set(&self, _count: i64) -> CacheResult<()> {
        Ok(())
    }

    // Nothing is stored, so there is never a slot to count from.
    async fn increment(&self) -> CacheResult<i64> {
        Ok(0)
    }

    async fn invalidate(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
