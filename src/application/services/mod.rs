//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ApplicationService`]: intake, detached fan-out, status reads
//! - [`SubmissionFanout`]: concurrent submit to every configured bank
//! - [`SubmissionReconciler`]: one polling pass over in-flight applications
//! - [`ReconciliationLoop`]: the background worker driving the reconciler

pub mod application_service;
pub mod reconciliation_loop;
pub mod submission_fanout;
pub mod submission_reconciler;

#[cfg(test)]
pub(crate) mod test_support;

pub use application_service::{ApplicationService, SubmissionReceipt};
pub use reconciliation_loop::ReconciliationLoop;
pub use submission_fanout::{SubmissionFanout, SubmissionOutcome};
pub use submission_reconciler::{PassReport, SubmissionReconciler};
