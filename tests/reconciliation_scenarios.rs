//! End-to-end runs of intake, fan-out and reconciliation over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{Harness, ScriptedBank, customer, terms};
use offer_aggregator::application::services::ReconciliationLoop;
use offer_aggregator::domain::value_objects::{
    ApplicationId, ApplicationStatus, OfferStatus, SubmissionStatus,
};
use offer_aggregator::infrastructure::banks::{BankError, BankVerdict};
use std::sync::Arc;
use std::time::Duration;

fn status_of(statuses: &[(String, SubmissionStatus)], bank: &str) -> SubmissionStatus {
    statuses
        .iter()
        .find(|(name, _)| name == bank)
        .map(|(_, status)| *status)
        .unwrap()
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn partial_success_completes_with_one_offer() {
        let fast = Arc::new(
            ScriptedBank::accepting("FastBank", "fb-100")
                .then_polls(vec![Ok(Some(BankVerdict::Approved(Some(terms()))))]),
        );
        let solid = Arc::new(ScriptedBank::refusing(
            "SolidBank",
            BankError::connection("connection refused"),
        ));
        let harness = Harness::new(&[fast.clone(), solid.clone()]);

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        let report = harness.reconciler.run_pass().await;
        assert_eq!(report.applications_completed, 1);

        let application = harness.service.get_status(&receipt.id).await.unwrap();
        assert_eq!(application.status(), ApplicationStatus::Completed);

        assert_eq!(application.offers().len(), 1);
        let offer = &application.offers()[0];
        assert_eq!(offer.bank_name().as_str(), "FastBank");
        assert_eq!(offer.status(), OfferStatus::Approved);
        assert_eq!(offer.terms(), Some(&terms()));

        let statuses: Vec<_> = application
            .submissions()
            .iter()
            .map(|s| (s.bank_name().to_string(), s.status()))
            .collect();
        assert_eq!(statuses.len(), 2);
        assert_eq!(status_of(&statuses, "FastBank"), SubmissionStatus::Success);
        assert_eq!(status_of(&statuses, "SolidBank"), SubmissionStatus::Failed);
        assert_eq!(solid.polled(), 0);
    }

    #[tokio::test]
    async fn rejection_after_three_pending_polls() {
        let bank = Arc::new(ScriptedBank::accepting("FastBank", "fb-200").then_polls(vec![
            Ok(None),
            Ok(None),
            Ok(None),
            Ok(Some(BankVerdict::Rejected)),
        ]));
        let harness = Harness::new(&[bank.clone()]);

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        for pass in 1..=3 {
            harness.reconciler.run_pass().await;
            let application = harness.service.get_status(&receipt.id).await.unwrap();
            assert_eq!(
                application.status(),
                ApplicationStatus::Processing,
                "pass {pass}"
            );
            assert!(application.offers().is_empty());
        }

        harness.reconciler.run_pass().await;
        let application = harness.service.get_status(&receipt.id).await.unwrap();

        assert_eq!(application.status(), ApplicationStatus::Completed);
        assert_eq!(application.offers().len(), 1);
        assert_eq!(application.offers()[0].status(), OfferStatus::Rejected);
        assert!(application.offers()[0].terms().is_none());
        assert_eq!(bank.polled(), 4);
    }

    #[tokio::test]
    async fn status_of_unknown_and_known_applications() {
        let bank = Arc::new(ScriptedBank::accepting("FastBank", "fb-300"));
        let harness = Harness::new(&[bank]);

        let missing = harness.service.get_status(&ApplicationId::new_v4()).await;
        assert!(missing.unwrap_err().is_not_found());

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        let application = harness.service.get_status(&receipt.id).await.unwrap();
        assert_eq!(application.id(), receipt.id);
        assert_eq!(application.status(), ApplicationStatus::Processing);
        assert_eq!(application.submissions().len(), 1);
        assert_eq!(application.submissions()[0].external_id(), Some("fb-300"));
        assert!(application.offers().is_empty());
    }
}

mod properties {
    use super::*;

    #[tokio::test]
    async fn submit_returns_before_banks_reply() {
        let bank = Arc::new(
            ScriptedBank::accepting("FastBank", "fb-400").slow(Duration::from_millis(300)),
        );
        let harness = Harness::new(&[bank]);

        let receipt = harness.service.submit(customer()).await.unwrap();
        assert_eq!(receipt.status, ApplicationStatus::Pending);

        let application = harness.service.get_status(&receipt.id).await.unwrap();
        assert!(application.submissions().is_empty());

        harness.service.drain().await;
        let application = harness.service.get_status(&receipt.id).await.unwrap();
        assert_eq!(application.submissions().len(), 1);
    }

    #[tokio::test]
    async fn one_submission_per_configured_bank() {
        let banks = [
            Arc::new(ScriptedBank::accepting("FastBank", "fb-500")),
            Arc::new(ScriptedBank::accepting("SolidBank", "sb-500")),
            Arc::new(ScriptedBank::refusing(
                "ThirdBank",
                BankError::protocol("unexpected status 503"),
            )),
        ];
        let harness = Harness::new(&banks);

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        let application = harness.service.get_status(&receipt.id).await.unwrap();
        let mut names: Vec<_> = application
            .submissions()
            .iter()
            .map(|s| s.bank_name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["FastBank", "SolidBank", "ThirdBank"]);

        for submission in application.submissions() {
            match submission.status() {
                SubmissionStatus::Draft => {
                    assert!(submission.external_id().is_some_and(|id| !id.is_empty()));
                }
                SubmissionStatus::Failed => {
                    assert!(submission.error().is_some_and(|e| !e.is_empty()));
                }
                SubmissionStatus::Success => unreachable!("nothing polled yet"),
            }
        }
    }

    #[tokio::test]
    async fn completed_application_stays_completed() {
        let bank = Arc::new(
            ScriptedBank::accepting("FastBank", "fb-600")
                .then_polls(vec![Ok(Some(BankVerdict::Approved(None)))]),
        );
        let harness = Harness::new(&[bank.clone()]);

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        harness.reconciler.run_pass().await;
        for _ in 0..3 {
            let report = harness.reconciler.run_pass().await;
            assert_eq!(report.applications_scanned, 0);
        }

        let application = harness.service.get_status(&receipt.id).await.unwrap();
        assert_eq!(application.status(), ApplicationStatus::Completed);
        assert_eq!(application.offers().len(), 1);
        assert_eq!(bank.polled(), 1);
    }

    #[tokio::test]
    async fn loop_converges_without_manual_passes() {
        let bank = Arc::new(
            ScriptedBank::accepting("FastBank", "fb-700")
                .then_polls(vec![Ok(None), Ok(Some(BankVerdict::Rejected))]),
        );
        let harness = Harness::new(&[bank]);

        let receipt = harness.service.submit(customer()).await.unwrap();
        harness.service.drain().await;

        let reconciliation =
            ReconciliationLoop::new(Arc::clone(&harness.reconciler), Duration::from_millis(20));
        assert!(!reconciliation.stop().await);
        assert!(reconciliation.start().await);
        assert!(!reconciliation.start().await);

        let mut status = ApplicationStatus::Processing;
        for _ in 0..100 {
            status = harness.service.get_status(&receipt.id).await.unwrap().status();
            if status == ApplicationStatus::Completed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(reconciliation.stop().await);
        assert_eq!(status, ApplicationStatus::Completed);
        assert!(!reconciliation.is_running().await);
    }
}
