//! Redis-backed counter cache.

use super::service::{CacheError, CacheResult, CounterCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Redis key holding the cached visit count.
pub const VISITS_COUNT_KEY: &str = "visits:count";

/// Default lifetime of the cached count.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 10;

/// Default upper bound for a single Redis round-trip.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(100);

/// Redis counter cache.
///
/// Uses `ConnectionManager` for automatic reconnection. Every command is bounded by
/// `op_timeout` so a slow Redis degrades to a cache error instead of stalling the
/// request. Errors are returned to the caller, which decides how to degrade.
pub struct RedisCounterCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    op_timeout: Duration,
    key: String,
}

impl RedisCounterCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - TTL applied on every write path (`CACHE_TTL_SECONDS`)
    /// - `op_timeout` - Upper bound for each command (`CACHE_TIMEOUT_MS`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        ttl_seconds: u64,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let cache = Self {
            client: manager,
            ttl_seconds,
            op_timeout,
            key: VISITS_COUNT_KEY.to_string(),
        };

        let mut conn = cache.client.clone();
        cache
            .bounded(conn.ping::<()>())
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(cache)
    }

    /// Runs a Redis command under the operation timeout.
    async fn bounded<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }
}

/// Separates transport failures from protocol-level ones.
fn classify(e: RedisError) -> CacheError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
    {
        CacheError::ConnectionError(e.to_string())
    } else {
        CacheError::OperationError(e.to_string())
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn get(&self) -> CacheResult<Option<i64>> {
        let mut conn = self.client.clone();
        let value = self.bounded(conn.get::<_, Option<i64>>(&self.key)).await?;

        match value {
            Some(count) => debug!("Cache HIT: {} = {}", self.key, count),
            None => debug!("Cache MISS: {}", self.key),
        }

        Ok(value)
    }

    async fn set(&self, count: i64) -> CacheResult<()> {
        let mut conn = self.client.clone();
        self.bounded(conn.set_ex::<_, _, ()>(&self.key, count, self.ttl_seconds))
            .await?;

        debug!(
            "Cache SET: {} = {} (TTL: {}s)",
            self.key, count, self.ttl_seconds
        );
        Ok(())
    }

    async fn increment(&self) -> CacheResult<i64> {
        let mut conn = self.client.clone();

        // INCR and EXPIRE run in one MULTI/EXEC so the slot never outlives its TTL.
        let mut pipe = redis::pipe();
        pipe.atomic()
            .incr(&self.key, 1)
            .expire(&self.key, self.ttl_seconds as i64);

        let (count, _): (i64, i64) = self.bounded(pipe.query_async(&mut conn)).await?;

        debug!("Cache INCR: {} = {}", self.key, count);
        Ok(count)
    }

    async fn invalidate(&self) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let deleted = self.bounded(conn.del::<_, i64>(&self.key)).await?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", self.key);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        self.bounded(conn.ping::<()>()).await.is_ok()
    }
}
