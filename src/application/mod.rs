//! # Application Layer
//!
//! Use cases coordinating the domain with banks and storage.
//!
//! - [`error`]: application error type
//! - [`services`]: intake, fan-out and reconciliation

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
