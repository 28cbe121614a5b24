//! # Domain Entities
//!
//! ## Aggregates
//!
//! - [`Application`]: customer application with status state machine
//!
//! ## Entities
//!
//! - [`BankSubmission`]: one application's submission to one bank
//! - [`Offer`]: a bank's verdict

pub mod application;
pub mod bank_submission;
pub mod offer;

pub use application::Application;
pub use bank_submission::BankSubmission;
pub use offer::Offer;
