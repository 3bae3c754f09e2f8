//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Counter cache (Redis and no-op implementations)
//! - [`persistence`] - Visit store (PostgreSQL and no-op implementations)

pub mod cache;
pub mod persistence;
