//! # Domain Services
//!
//! Domain logic that doesn't naturally belong to a single entity.
//!
//! ## Services
//!
//! - [`status_aggregator`]: application status from submission statuses

pub mod status_aggregator;
