//! HTTP request handlers.

pub mod health;
pub mod visits;

pub use health::health_handler;
pub use visits::{ping_handler, visits_handler};
