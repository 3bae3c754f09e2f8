//! Application layer services implementing business logic.
//!
//! This layer coordinates the visit store and the counter cache. Services consume
//! the domain and cache traits and provide a small API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::visit_service::VisitService`] - Cache-aside visit counting
//! - [`services::visit_service::DevModeVisitService`] - Non-persisting dev mode variant
//!
//! Both implement [`services::VisitUseCase`], which is what handlers depend on.
//! [`resync_worker`] periodically rebuilds the cached counter from the store.

pub mod resync_worker;
pub mod services;
