//! Visit store implementations.
//!
//! # Repositories
//!
//! - [`PgVisitRepository`] - PostgreSQL-backed visit log (SQLx)
//! - [`NullVisitRepository`] - No-op store used in dev mode

pub mod null_visit_repository;
pub mod pg_visit_repository;

pub use null_visit_repository::NullVisitRepository;
pub use pg_visit_repository::{DEFAULT_QUERY_TIMEOUT, PgVisitRepository};
