//! Request middleware.
//!
//! Request tracing and the cross-origin policy. Bearer authentication is an
//! extractor in [`crate::inbound::http::auth`].

pub mod cors;
pub mod trace;

pub use cors::{CorsOrigins, cors};
pub use trace::Trace;
