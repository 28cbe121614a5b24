//! # Bank Submission Entity
//!
//! Tracks one application's submission to one bank.
//!
//! ```text
//! Draft → Success
//!   ↓
//! Failed
//! ```
//!
//! A submission is created either as `Draft` (the bank acknowledged it and
//! returned a tracking id) or directly as `Failed` (the submit call failed).
//! A draft leaves `Draft` exactly once and never returns to it.
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::entities::BankSubmission;
//! use offer_aggregator::domain::value_objects::{ApplicationId, BankName, SubmissionStatus};
//!
//! let mut submission = BankSubmission::draft(
//!     ApplicationId::new_v4(),
//!     BankName::new("FastBank"),
//!     "fb-123",
//! );
//! assert_eq!(submission.status(), SubmissionStatus::Draft);
//!
//! submission.mark_success().unwrap();
//! assert!(submission.is_terminal());
//! assert!(submission.mark_failed("late error").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    ApplicationId, BankName, SubmissionId, SubmissionStatus, Timestamp,
};
use serde::{Deserialize, Serialize};

/// One application's submission to one bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSubmission {
    id: SubmissionId,
    application_id: ApplicationId,
    bank_name: BankName,
    status: SubmissionStatus,
    external_id: Option<String>,
    submitted_at: Timestamp,
    completed_at: Option<Timestamp>,
    error: Option<String>,
    created_at: Timestamp,
}

impl BankSubmission {
    /// Creates a submission the bank acknowledged with `external_id`.
    #[must_use]
    pub fn draft(
        application_id: ApplicationId,
        bank_name: BankName,
        external_id: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubmissionId::new_v4(),
            application_id,
            bank_name,
            status: SubmissionStatus::Draft,
            external_id: Some(external_id.into()),
            submitted_at: now,
            completed_at: None,
            error: None,
            created_at: now,
        }
    }

    /// Creates a submission whose submit call failed.
    #[must_use]
    pub fn failed(
        application_id: ApplicationId,
        bank_name: BankName,
        error: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubmissionId::new_v4(),
            application_id,
            bank_name,
            status: SubmissionStatus::Failed,
            external_id: None,
            submitted_at: now,
            completed_at: Some(now),
            error: Some(error.into()),
            created_at: now,
        }
    }

    /// Reconstructs a submission from storage.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: SubmissionId,
        application_id: ApplicationId,
        bank_name: BankName,
        status: SubmissionStatus,
        external_id: Option<String>,
        submitted_at: Timestamp,
        completed_at: Option<Timestamp>,
        error: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            application_id,
            bank_name,
            status,
            external_id,
            submitted_at,
            completed_at,
            error,
            created_at,
        }
    }

    /// Records that the bank delivered a verdict.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the submission already left draft.
    pub fn mark_success(&mut self) -> DomainResult<()> {
        self.leave_draft(SubmissionStatus::Success)?;
        Ok(())
    }

    /// Records a poll failure; the submission is never polled again.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the submission already left draft.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> DomainResult<()> {
        self.leave_draft(SubmissionStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn leave_draft(&mut self, target: SubmissionStatus) -> DomainResult<()> {
        if self.status != SubmissionStatus::Draft {
            return Err(DomainError::transition("submission", self.status, target));
        }
        self.status = target;
        self.completed_at = Some(Timestamp::now());
        Ok(())
    }

    // ========== Accessors ==========

    /// Returns the submission ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns the owning application ID.
    #[inline]
    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the bank name.
    #[inline]
    #[must_use]
    pub fn bank_name(&self) -> &BankName {
        &self.bank_name
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Returns the bank's tracking id, absent if submit failed.
    #[inline]
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Returns when the submission was sent.
    #[inline]
    #[must_use]
    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    /// Returns when the submission left draft.
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Returns the recorded error message.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns when the record was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true once the submission left draft.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
