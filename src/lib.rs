//! # Offer Aggregator
//!
//! Collects financing offers for one customer application from several
//! independent banks.
//!
//! An application is submitted to every configured bank at once. Each bank
//! acknowledges with a tracking id and decides later, so a background
//! reconciliation loop polls the open submissions, records the offers, and
//! completes the application once no bank is still deciding.
//!
//! # Architecture
//!
//! ```text
//! api::rest ──► application::services ──► domain
//!                     │
//!                     ▼
//!              infrastructure (banks, persistence, config, logging)
//! ```
//!
//! - [`domain`]: entities, value objects, status aggregation
//! - [`application`]: intake, fan-out, reconciliation
//! - [`infrastructure`]: bank clients, repositories, configuration, logging
//! - [`api`]: HTTP endpoints
//!
//! # Lifecycle
//!
//! ```text
//! Application: PENDING ──► PROCESSING ──► COMPLETED
//! Submission:  DRAFT ──► SUCCESS | FAILED   (or FAILED at submit time)
//! ```

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
