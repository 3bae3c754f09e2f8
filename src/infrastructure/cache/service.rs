//! Counter cache trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// A missing key is not an error; it is reported as `Ok(None)` by
/// [`CounterCache::get`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A single TTL-bounded slot holding the approximate visit count.
///
/// The cache is an accelerator, not a system of record: its value may lag behind the
/// store, and it may be absent at any time. Implementations report transport faults as
/// errors and leave it to the caller to degrade gracefully.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCounterCache`] - Redis-backed counter with TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// Reads the cached count.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(count))` on cache hit
    /// - `Ok(None)` when the slot is absent or expired
    ///
    /// # Errors
    ///
    /// Returns an error only on transport or protocol failures.
    async fn get(&self) -> CacheResult<Option<i64>>;

    /// Stores an absolute count, replacing any previous value and resetting the TTL.
    async fn set(&self, count: i64) -> CacheResult<()>;

    /// Atomically adds one to the cached count, reapplies the TTL, and returns the
    /// new value.
    ///
    /// Creates the slot with value 1 when absent, so a result of 1 means the slot had
    /// expired or was never populated. Concurrent increments never lose updates.
    async fn increment(&self) -> CacheResult<i64>;

    /// Deletes the slot so the next read goes to the store.
    async fn invalidate(&self) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health check endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
