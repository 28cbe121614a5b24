//! Shared fixtures for the integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use async_trait::async_trait;
use offer_aggregator::application::services::{
    ApplicationService, SubmissionFanout, SubmissionReconciler,
};
use offer_aggregator::domain::value_objects::{BankName, CustomerData, MaritalStatus, OfferTerms};
use offer_aggregator::infrastructure::banks::{
    BankClient, BankError, BankRegistry, BankResult, BankVerdict,
};
use offer_aggregator::infrastructure::persistence::InMemoryStore;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bank double answering submits with a fixed result and polls from a script.
#[derive(Debug)]
pub struct ScriptedBank {
    name: BankName,
    submit: BankResult<String>,
    polls: Mutex<VecDeque<BankResult<Option<BankVerdict>>>>,
    submit_delay: Duration,
    polled: AtomicUsize,
}

impl ScriptedBank {
    pub fn accepting(name: &str, external_id: &str) -> Self {
        Self::new(name, Ok(external_id.to_string()))
    }

    pub fn refusing(name: &str, error: BankError) -> Self {
        Self::new(name, Err(error))
    }

    fn new(name: &str, submit: BankResult<String>) -> Self {
        Self {
            name: BankName::new(name),
            submit,
            polls: Mutex::new(VecDeque::new()),
            submit_delay: Duration::ZERO,
            polled: AtomicUsize::new(0),
        }
    }

    pub fn then_polls(self, polls: Vec<BankResult<Option<BankVerdict>>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn polled(&self) -> usize {
        self.polled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BankClient for ScriptedBank {
    fn bank_name(&self) -> &BankName {
        &self.name
    }

    fn timeout_ms(&self) -> u64 {
        5_000
    }

    async fn submit(&self, _customer: &CustomerData) -> BankResult<String> {
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        self.submit.clone()
    }

    async fn poll(&self, _external_id: &str) -> BankResult<Option<BankVerdict>> {
        self.polled.fetch_add(1, Ordering::SeqCst);
        self.polls.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Services wired over one in-memory store.
pub struct Harness {
    pub store: InMemoryStore,
    pub service: ApplicationService,
    pub reconciler: Arc<SubmissionReconciler>,
}

impl Harness {
    pub fn new(banks: &[Arc<ScriptedBank>]) -> Self {
        let registry = BankRegistry::new(
            banks
                .iter()
                .map(|b| Arc::clone(b) as Arc<dyn BankClient>)
                .collect(),
        )
        .unwrap();
        let store = InMemoryStore::new();

        let service = ApplicationService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            SubmissionFanout::new(registry.clone()),
        );
        let reconciler = Arc::new(SubmissionReconciler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            registry,
        ));

        Self {
            store,
            service,
            reconciler,
        }
    }
}

pub fn customer() -> CustomerData {
    CustomerData::builder("+37126000000", "sam@example.com", Decimal::new(2500, 0))
        .monthly_income(Decimal::new(4200, 0))
        .monthly_expenses(Decimal::new(1100, 0))
        .marital_status(MaritalStatus::Married)
        .agree_to_be_scored(true)
        .dependents(2)
        .build()
        .unwrap()
}

pub fn terms() -> OfferTerms {
    OfferTerms::new(
        Decimal::new(22_150, 2),
        Decimal::new(2658, 0),
        12,
        Decimal::new(99, 1),
        "2026-11-30".to_string(),
    )
}
