//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ApplicationId`], [`SubmissionId`], [`OfferId`]: UUID-based identifiers
//! - [`BankName`]: String-based bank identity
//!
//! ## Domain Enums
//!
//! - [`ApplicationStatus`], [`SubmissionStatus`], [`OfferStatus`]: lifecycle states
//! - [`MaritalStatus`]: customer field
//!
//! ## Composite Values
//!
//! - [`CustomerData`]: validated customer input
//! - [`OfferTerms`]: repayment terms of an approved offer
//! - [`Timestamp`]: UTC point in time

pub mod customer_data;
pub mod enums;
pub mod ids;
pub mod offer_terms;
pub mod timestamp;

pub use customer_data::{CustomerData, CustomerDataBuilder};
pub use enums::{ApplicationStatus, MaritalStatus, OfferStatus, ParseEnumError, SubmissionStatus};
pub use ids::{ApplicationId, BankName, OfferId, SubmissionId};
pub use offer_terms::OfferTerms;
pub use timestamp::Timestamp;
