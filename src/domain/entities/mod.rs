//! Core domain entities.
//!
//! - [`Visit`] - A single recorded request, owned by the event store

pub mod visit;

pub use visit::Visit;
