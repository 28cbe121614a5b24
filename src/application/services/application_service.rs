//! # Application Service
//!
//! Intake and status reads for financing applications.
//!
//! [`ApplicationService::submit`] persists the application as `PENDING` and
//! returns at once. Fan-out to the banks runs in a detached task whose lifetime
//! is owned by the service's [`TaskTracker`], not by the calling request, so
//! dropping the request never cancels it. Failures inside that task can only
//! be logged.
//!
//! The application is left `PROCESSING` after fan-out even when every bank
//! already failed; the reconciliation loop is the only place that finalizes
//! an application's status.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::submission_fanout::SubmissionFanout;
use crate::domain::entities::{Application, BankSubmission};
use crate::domain::value_objects::{ApplicationId, ApplicationStatus, CustomerData};
use crate::infrastructure::persistence::{ApplicationRepository, BankSubmissionRepository};
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// Answer to a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Id assigned to the application.
    pub id: ApplicationId,
    /// Status at intake, always `PENDING`.
    pub status: ApplicationStatus,
}

/// Application lifecycle service.
#[derive(Debug, Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    submissions: Arc<dyn BankSubmissionRepository>,
    fanout: SubmissionFanout,
    tasks: TaskTracker,
}

impl ApplicationService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        submissions: Arc<dyn BankSubmissionRepository>,
        fanout: SubmissionFanout,
    ) -> Self {
        Self {
            applications,
            submissions,
            fanout,
            tasks: TaskTracker::new(),
        }
    }

    /// Accepts an application and schedules its fan-out.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Persistence` if the application cannot be stored.
    pub async fn submit(&self, customer: CustomerData) -> ApplicationResult<SubmissionReceipt> {
        let application = Application::new(customer);
        self.applications.create(&application).await?;

        let receipt = SubmissionReceipt {
            id: application.id(),
            status: application.status(),
        };
        tracing::info!(application_id = %receipt.id, "application accepted");

        let service = self.clone();
        self.tasks.spawn(async move {
            let application_id = application.id();
            if let Err(e) = service.process_application(application).await {
                tracing::error!(%application_id, error = %e, "application processing failed");
            }
        });

        Ok(receipt)
    }

    /// Moves an application to `PROCESSING`, fans it out, and records one
    /// submission per bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the status change is not allowed or a write fails.
    pub async fn process_application(&self, mut application: Application) -> ApplicationResult<()> {
        let application_id = application.id();

        application.start_processing()?;
        self.applications.update(&application).await?;

        let outcomes = self.fanout.submit_all(application.customer()).await;
        let submissions: Vec<BankSubmission> = outcomes
            .into_iter()
            .map(|outcome| outcome.into_submission(application_id))
            .collect();

        self.submissions.create_batch(&submissions).await?;

        let accepted = submissions.iter().filter(|s| !s.is_terminal()).count();
        tracing::info!(
            %application_id,
            banks = submissions.len(),
            accepted,
            "application fanned out"
        );
        Ok(())
    }

    /// Returns an application with its submissions and offers.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown id.
    pub async fn get_status(&self, id: &ApplicationId) -> ApplicationResult<Application> {
        self.applications
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Application", id.to_string()))
    }

    /// Returns the number of fan-outs still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every detached fan-out to finish.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}
