//! # Status Aggregator
//!
//! Derives an application's status from the statuses of its bank submissions.
//!
//! | Submissions                      | Application  |
//! |----------------------------------|--------------|
//! | none                             | `PENDING`    |
//! | at least one `DRAFT`             | `PROCESSING` |
//! | all `SUCCESS` or `FAILED` (any mix) | `COMPLETED` |
//!
//! A failed bank does not fail the application: partial success still
//! completes it.
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::services::status_aggregator;
//! use offer_aggregator::domain::value_objects::{ApplicationStatus, SubmissionStatus};
//!
//! let status = status_aggregator::aggregate([SubmissionStatus::Success, SubmissionStatus::Failed]);
//! assert_eq!(status, ApplicationStatus::Completed);
//! ```

use crate::domain::value_objects::{ApplicationStatus, SubmissionStatus};

/// Computes the application status implied by `statuses`.
#[must_use]
pub fn aggregate<I>(statuses: I) -> ApplicationStatus
where
    I: IntoIterator<Item = SubmissionStatus>,
{
    let mut seen_any = false;
    for status in statuses {
        if !status.is_terminal() {
            return ApplicationStatus::Processing;
        }
        seen_any = true;
    }

    if seen_any {
        ApplicationStatus::Completed
    } else {
        ApplicationStatus::Pending
    }
}

/// Returns true if an application with these submissions can be completed.
#[must_use]
pub fn is_resolvable<I>(statuses: I) -> bool
where
    I: IntoIterator<Item = SubmissionStatus>,
{
    aggregate(statuses) == ApplicationStatus::Completed
}
