//! # API Layer
//!
//! External interfaces of the service.
//!
//! - [`rest`]: HTTP/JSON endpoints (axum)

pub mod rest;
