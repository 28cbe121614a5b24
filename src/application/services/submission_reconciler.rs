//! # Submission Reconciler
//!
//! One reconciliation pass: poll every `DRAFT` submission of every
//! `PROCESSING` application and finalize applications that no longer wait on
//! any bank.
//!
//! # Poll handling
//!
//! | Poll result | Submission | Offer |
//! |-------------|------------|-------|
//! | transport/protocol error | `FAILED`, error stored, never polled again | none |
//! | still working | unchanged | none |
//! | verdict | `SUCCESS` | `APPROVED` or `REJECTED` |
//!
//! A failure on one submission or application is logged and counted; the rest
//! of the pass still runs. Applications and submissions are handled serially.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Application, BankSubmission};
use crate::domain::value_objects::{ApplicationId, ApplicationStatus, SubmissionStatus};
use crate::infrastructure::banks::{BankError, BankRegistry, BankVerdict};
use crate::infrastructure::persistence::{
    ApplicationRepository, BankSubmissionRepository, OfferRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// `PROCESSING` applications examined.
    pub applications_scanned: usize,
    /// Poll calls made.
    pub submissions_polled: usize,
    /// Submissions that resolved with an offer.
    pub offers_created: usize,
    /// Submissions marked `FAILED` after a poll error.
    pub submissions_failed: usize,
    /// Polls answered with "still working".
    pub still_pending: usize,
    /// Applications moved to `COMPLETED`.
    pub applications_completed: usize,
    /// Units of work skipped because of an error.
    pub errors: usize,
}

/// Runs reconciliation passes.
#[derive(Debug, Clone)]
pub struct SubmissionReconciler {
    applications: Arc<dyn ApplicationRepository>,
    submissions: Arc<dyn BankSubmissionRepository>,
    offers: Arc<dyn OfferRepository>,
    registry: BankRegistry,
}

impl SubmissionReconciler {
    /// Creates a reconciler.
    #[must_use]
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        submissions: Arc<dyn BankSubmissionRepository>,
        offers: Arc<dyn OfferRepository>,
        registry: BankRegistry,
    ) -> Self {
        Self {
            applications,
            submissions,
            offers,
            registry,
        }
    }

    /// Runs one pass over all `PROCESSING` applications.
    pub async fn run_pass(&self) -> PassReport {
        let mut report = PassReport::default();

        let applications = match self
            .applications
            .find_by_status(ApplicationStatus::Processing)
            .await
        {
            Ok(applications) => applications,
            Err(e) => {
                tracing::error!(error = %e, "failed to load processing applications");
                report.errors += 1;
                return report;
            }
        };

        for mut application in applications {
            report.applications_scanned += 1;
            if let Err(e) = self.reconcile_application(&mut application, &mut report).await {
                report.errors += 1;
                tracing::error!(application_id = %application.id(), error = %e, "failed to reconcile application");
            }
        }

        if report.submissions_polled > 0 || report.errors > 0 {
            tracing::info!(?report, "reconciliation pass finished");
        }
        report
    }

    async fn reconcile_application(
        &self,
        application: &mut Application,
        report: &mut PassReport,
    ) -> ApplicationResult<()> {
        let application_id = application.id();

        for submission in application
            .submissions_mut()
            .iter_mut()
            .filter(|s| s.status() == SubmissionStatus::Draft)
        {
            if let Err(e) = self.reconcile_submission(application_id, submission, report).await {
                report.errors += 1;
                tracing::error!(
                    %application_id,
                    submission_id = %submission.id(),
                    bank = %submission.bank_name(),
                    error = %e,
                    "failed to reconcile submission"
                );
            }
        }

        if application.is_resolvable() {
            application.complete()?;
            self.applications.update(application).await?;
            report.applications_completed += 1;
            tracing::info!(%application_id, "application completed");
        }
        Ok(())
    }

    async fn reconcile_submission(
        &self,
        application_id: ApplicationId,
        submission: &mut BankSubmission,
        report: &mut PassReport,
    ) -> ApplicationResult<()> {
        let client = self.registry.get(submission.bank_name()).ok_or_else(|| {
            ApplicationError::configuration(format!(
                "no client configured for bank {}",
                submission.bank_name()
            ))
        })?;

        let external_id = submission
            .external_id()
            .ok_or_else(|| {
                ApplicationError::internal(format!(
                    "draft submission {} has no external id",
                    submission.id()
                ))
            })?
            .to_string();

        report.submissions_polled += 1;
        let timeout_ms = client.timeout_ms();
        let polled = match timeout(Duration::from_millis(timeout_ms), client.poll(&external_id)).await {
            Ok(result) => result,
            Err(_) => Err(BankError::timeout_with_duration("bank poll timed out", timeout_ms)),
        };

        match polled {
            Err(err) => {
                let mut updated = submission.clone();
                updated.mark_failed(err.to_string())?;
                self.submissions.update(&updated).await?;
                *submission = updated;
                report.submissions_failed += 1;
                tracing::warn!(
                    %application_id,
                    bank = %submission.bank_name(),
                    %external_id,
                    error = %err,
                    "bank poll failed, submission marked failed"
                );
            }
            Ok(None) => {
                report.still_pending += 1;
                tracing::debug!(%application_id, bank = %submission.bank_name(), %external_id, "bank still processing");
            }
            Ok(Some(verdict)) => {
                self.record_verdict(application_id, submission, verdict).await?;
                report.offers_created += 1;
            }
        }
        Ok(())
    }

    async fn record_verdict(
        &self,
        application_id: ApplicationId,
        submission: &mut BankSubmission,
        verdict: BankVerdict,
    ) -> ApplicationResult<()> {
        if !self.applications.exists(&application_id).await? {
            return Err(ApplicationError::not_found(
                "Application",
                application_id.to_string(),
            ));
        }

        let offer = verdict
            .clone()
            .into_offer(application_id, submission.bank_name().clone());
        match self.offers.create(&offer).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate() => {
                tracing::warn!(
                    %application_id,
                    bank = %submission.bank_name(),
                    "offer already recorded, completing submission"
                );
            }
            Err(e) => return Err(e.into()),
        }

        let mut updated = submission.clone();
        updated.mark_success()?;
        self.submissions.update(&updated).await?;
        *submission = updated;

        tracing::info!(
            %application_id,
            bank = %submission.bank_name(),
            offer_id = %offer.id(),
            %verdict,
            "bank verdict recorded"
        );
        Ok(())
    }
}
