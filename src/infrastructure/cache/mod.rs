//! Caching layer for the visit counter.
//!
//! Provides a [`CounterCache`] trait with two implementations:
//! - [`RedisCounterCache`] - Production Redis-backed counter
//! - [`NullCache`] - No-op implementation for dev mode or disabled caching

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::{
    DEFAULT_CACHE_TIMEOUT, DEFAULT_CACHE_TTL_SECONDS, RedisCounterCache, VISITS_COUNT_KEY,
};
pub use service::{CacheError, CacheResult, CounterCache};

#[cfg(test)]
pub use service::MockCounterCache;
