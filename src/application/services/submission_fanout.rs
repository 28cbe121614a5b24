//! # Submission Fan-out
//!
//! Submits one application to every configured bank concurrently and waits
//! for all of them.
//!
//! Each bank runs in its own task under its own timeout. A slow or failing
//! bank never cancels the others, and every configured bank yields exactly
//! one [`SubmissionOutcome`]. Outcomes carry no ordering guarantee.

use crate::domain::entities::BankSubmission;
use crate::domain::value_objects::{ApplicationId, BankName, CustomerData};
use crate::infrastructure::banks::{BankClient, BankError, BankRegistry, BankResult};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// One bank's answer to a submit call.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// Bank that was called.
    pub bank_name: BankName,
    /// The bank's tracking id, or why the call failed.
    pub result: BankResult<String>,
}

impl SubmissionOutcome {
    /// Returns true if the bank accepted the application.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }

    /// Turns the outcome into the submission record to persist.
    ///
    /// Accepted outcomes become `DRAFT` with the tracking id, failures become
    /// `FAILED` with the error message.
    #[must_use]
    pub fn into_submission(self, application_id: ApplicationId) -> BankSubmission {
        match self.result {
            Ok(external_id) => BankSubmission::draft(application_id, self.bank_name, external_id),
            Err(err) => BankSubmission::failed(application_id, self.bank_name, err.to_string()),
        }
    }
}

/// Concurrent submit to all configured banks.
#[derive(Debug, Clone)]
pub struct SubmissionFanout {
    registry: BankRegistry,
}

impl SubmissionFanout {
    /// Creates a fan-out over the banks in `registry`.
    #[must_use]
    pub fn new(registry: BankRegistry) -> Self {
        Self { registry }
    }

    /// Returns the bank registry.
    #[must_use]
    pub fn registry(&self) -> &BankRegistry {
        &self.registry
    }

    /// Submits `customer` to every bank and returns one outcome per bank.
    pub async fn submit_all(&self, customer: &CustomerData) -> Vec<SubmissionOutcome> {
        let clients = self.registry.clients();
        let mut names = Vec::with_capacity(clients.len());
        let mut handles = Vec::with_capacity(clients.len());

        for client in clients {
            names.push(client.bank_name().clone());
            let client = Arc::clone(client);
            let customer = customer.clone();
            handles.push(tokio::spawn(async move { submit_one(client, customer).await }));
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(names)
            .map(|(joined, bank_name)| {
                joined.unwrap_or_else(|e| SubmissionOutcome {
                    bank_name,
                    result: Err(BankError::internal(format!("submit task failed: {e}"))),
                })
            })
            .collect()
    }
}

async fn submit_one(client: Arc<dyn BankClient>, customer: CustomerData) -> SubmissionOutcome {
    let bank_name = client.bank_name().clone();
    let timeout_ms = client.timeout_ms();

    let result = match timeout(Duration::from_millis(timeout_ms), client.submit(&customer)).await {
        Ok(result) => result,
        Err(_) => Err(BankError::timeout_with_duration(
            "bank submit timed out",
            timeout_ms,
        )),
    };

    match &result {
        Ok(external_id) => tracing::debug!(bank = %bank_name, %external_id, "bank accepted application"),
        Err(e) => tracing::warn!(bank = %bank_name, error = %e, "bank submit failed"),
    }

    SubmissionOutcome { bank_name, result }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{MockBankClient, customer, registry};
    use crate::domain::value_objects::SubmissionStatus;
    use std::collections::HashSet;
    use std::time::Instant;

    #[tokio::test]
    async fn one_outcome_per_bank() {
        let banks = [
            Arc::new(MockBankClient::accepting("FastBank", "fb-1")),
            Arc::new(MockBankClient::failing(
                "SolidBank",
                BankError::connection("refused"),
            )),
            Arc::new(MockBankClient::accepting("ThirdBank", "tb-1")),
        ];
        let fanout = SubmissionFanout::new(registry(&banks));

        let outcomes = fanout.submit_all(&customer()).await;

        assert_eq!(outcomes.len(), 3);
        let names: HashSet<_> = outcomes.iter().map(|o| o.bank_name.as_str().to_string()).collect();
        assert_eq!(names.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.is_accepted()).count(), 2);
        assert!(banks.iter().all(|b| b.submit_calls() == 1));
    }

    #[tokio::test]
    async fn no_banks_no_outcomes() {
        let fanout = SubmissionFanout::new(registry(&[]));
        assert!(fanout.submit_all(&customer()).await.is_empty());
    }

    #[tokio::test]
    async fn slow_bank_times_out_alone() {
        let banks = [
            Arc::new(MockBankClient::accepting("FastBank", "fb-1")),
            Arc::new(
                MockBankClient::accepting("SolidBank", "sb-1")
                    .with_delay(2_000)
                    .with_timeout(50),
            ),
        ];
        let fanout = SubmissionFanout::new(registry(&banks));

        let outcomes = fanout.submit_all(&customer()).await;

        let slow = outcomes
            .iter()
            .find(|o| o.bank_name.as_str() == "SolidBank")
            .unwrap();
        let err = slow.result.as_ref().unwrap_err();
        assert!(err.is_transport());
        assert_eq!(
            *err,
            BankError::timeout_with_duration("bank submit timed out", 50)
        );

        let fast = outcomes
            .iter()
            .find(|o| o.bank_name.as_str() == "FastBank")
            .unwrap();
        assert_eq!(fast.result.as_deref().ok(), Some("fb-1"));
    }

    #[tokio::test]
    async fn banks_run_concurrently() {
        let banks = [
            Arc::new(MockBankClient::accepting("A", "a").with_delay(200)),
            Arc::new(MockBankClient::accepting("B", "b").with_delay(200)),
            Arc::new(MockBankClient::accepting("C", "c").with_delay(200)),
        ];
        let fanout = SubmissionFanout::new(registry(&banks));

        let started = Instant::now();
        let outcomes = fanout.submit_all(&customer()).await;

        assert_eq!(outcomes.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    mod into_submission {
        use super::*;

        #[test]
        fn accepted_is_draft() {
            let app_id = ApplicationId::new_v4();
            let submission = SubmissionOutcome {
                bank_name: BankName::new("FastBank"),
                result: Ok("fb-9".to_string()),
            }
            .into_submission(app_id);

            assert_eq!(submission.status(), SubmissionStatus::Draft);
            assert_eq!(submission.external_id(), Some("fb-9"));
            assert_eq!(submission.application_id(), app_id);
            assert!(submission.completed_at().is_none());
        }

        #[test]
        fn failure_is_failed_with_message() {
            let submission = SubmissionOutcome {
                bank_name: BankName::new("SolidBank"),
                result: Err(BankError::protocol("HTTP 404")),
            }
            .into_submission(ApplicationId::new_v4());

            assert_eq!(submission.status(), SubmissionStatus::Failed);
            assert!(submission.external_id().is_none());
            assert!(!submission.error().unwrap_or_default().is_empty());
            assert!(submission.completed_at().is_some());
        }
    }
}
