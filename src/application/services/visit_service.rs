//! Visit recording and counting with a cache-aside counter.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::repositories::VisitRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CounterCache};

/// Count reported by [`DevModeVisitService`] instead of a real total.
pub const DEV_MODE_SENTINEL: i64 = -1;

/// The two operations exposed to the delivery layer.
///
/// # Implementations
///
/// - [`VisitService`] - Store-backed counting with a cache-aside counter
/// - [`DevModeVisitService`] - Accepts visits without persisting them, reports
///   [`DEV_MODE_SENTINEL`]
#[async_trait]
pub trait VisitUseCase: Send + Sync {
    /// Records one visit from `ip_address`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::WriteFailed`] when the visit could not be stored.
    async fn record_visit(&self, ip_address: &str) -> Result<(), AppError>;

    /// Returns the current visit count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ReadFailed`] when neither the cache nor the store could answer.
    async fn visits_count(&self) -> Result<i64, AppError>;
}

/// Service coordinating the visit store with the counter cache.
///
/// The store is the system of record; the cache only accelerates reads. Store
/// failures are returned to the caller, cache failures are logged, counted in
/// `visit_cache_errors_total`, and otherwise ignored.
///
/// The service holds no mutable state. Concurrency safety is delegated to the store
/// and to the cache's atomic increment.
pub struct VisitService {
    repository: Arc<dyn VisitRepository>,
    cache: Arc<dyn CounterCache>,
}

impl VisitService {
    /// Creates a new visit service.
    pub fn new(repository: Arc<dyn VisitRepository>, cache: Arc<dyn CounterCache>) -> Self {
        Self { repository, cache }
    }

    /// Rewrites the cached counter from the store's count.
    ///
    /// Used at startup to warm the cache and by the resync worker to bound drift
    /// between the cache and the store. A cache failure is logged and does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ReadFailed`] if the store count fails.
    pub async fn resync_cache(&self) -> Result<i64, AppError> {
        let count = self
            .repository
            .count()
            .await
            .map_err(AppError::ReadFailed)?;

        if let Err(e) = self.cache.set(count).await {
            observe_cache_error("set", &e);
        }

        Ok(count)
    }
}

#[async_trait]
impl VisitUseCase for VisitService {
    async fn record_visit(&self, ip_address: &str) -> Result<(), AppError> {
        self.repository
            .create(ip_address)
            .await
            .map_err(AppError::WriteFailed)?;

        match self.cache.increment().await {
            // The slot was absent and INCR restarted it from zero. Drop it so the next
            // read recounts from the store instead of serving 1.
            Ok(1) => {
                debug!("Cached counter restarted from zero, invalidating");
                if let Err(e) = self.cache.invalidate().await {
                    observe_cache_error("invalidate", &e);
                }
            }
            Ok(_) => {}
            Err(e) => observe_cache_error("increment", &e),
        }

        Ok(())
    }

    async fn visits_count(&self) -> Result<i64, AppError> {
        match self.cache.get().await {
            Ok(Some(count)) if count > 0 => {
                record_lookup("hit");
                return Ok(count);
            }
            // A cached zero cannot be told apart from a cold counter, so confirm it.
            Ok(Some(_)) => {
                debug!("Cached count is zero, confirming against store");
                record_lookup("zero");
            }
            Ok(None) => record_lookup("miss"),
            Err(e) => {
                observe_cache_error("get", &e);
                record_lookup("error");
            }
        }

        let count = self
            .repository
            .count()
            .await
            .map_err(AppError::ReadFailed)?;

        if let Err(e) = self.cache.set(count).await {
            observe_cache_error("set", &e);
        }

        Ok(count)
    }
}

/// Visit handling for dev mode.
///
/// Writes go through a [`VisitService`] that the server wires to no-op backends, so
/// they are accepted but not persisted. Count queries never touch a backend and
/// return [`DEV_MODE_SENTINEL`].
pub struct DevModeVisitService {
    inner: VisitService,
}

impl DevModeVisitService {
    /// Wraps a service whose store and cache are no-op implementations.
    pub fn new(inner: VisitService) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VisitUseCase for DevModeVisitService {
    async fn record_visit(&self, ip_address: &str) -> Result<(), AppError> {
        self.inner.record_visit(ip_address).await
    }

    async fn visits_count(&self) -> Result<i64, AppError> {
        Ok(DEV_MODE_SENTINEL)
    }
}

fn observe_cache_error(op: &'static str, e: &CacheError) {
    warn!(op, error = %e, "Cache operation failed, continuing without cache");
    metrics::counter!("visit_cache_errors_total", "op" => op).increment(1);
}

fn record_lookup(result: &'static str) {
    metrics::counter!("visit_cache_lookups_total", "result" => result).increment(1);
}
