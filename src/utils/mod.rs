//! Request helpers.
//!
//! - [`client_ip`] - Client address resolution (peer socket or proxy headers)

pub mod client_ip;
