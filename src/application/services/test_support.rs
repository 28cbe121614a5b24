//! Scripted bank clients and fixtures shared by the service tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::domain::value_objects::{BankName, CustomerData, MaritalStatus, OfferTerms};
use crate::infrastructure::banks::{BankClient, BankError, BankRegistry, BankResult, BankVerdict};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Bank double with a fixed submit answer and a queue of poll answers.
///
/// Once the queue is empty every poll reports "still working".
#[derive(Debug)]
pub(crate) struct MockBankClient {
    bank_name: BankName,
    submit_result: BankResult<String>,
    polls: Mutex<VecDeque<BankResult<Option<BankVerdict>>>>,
    delay_ms: u64,
    poll_delay_ms: u64,
    timeout_ms: u64,
    submit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl MockBankClient {
    pub(crate) fn accepting(bank: &str, external_id: &str) -> Self {
        Self::with_submit(bank, Ok(external_id.to_string()))
    }

    pub(crate) fn failing(bank: &str, error: BankError) -> Self {
        Self::with_submit(bank, Err(error))
    }

    fn with_submit(bank: &str, submit_result: BankResult<String>) -> Self {
        Self {
            bank_name: BankName::new(bank),
            submit_result,
            polls: Mutex::new(VecDeque::new()),
            delay_ms: 0,
            poll_delay_ms: 0,
            timeout_ms: 1000,
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_polls(self, polls: Vec<BankResult<Option<BankVerdict>>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub(crate) fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub(crate) fn with_poll_delay(mut self, poll_delay_ms: u64) -> Self {
        self.poll_delay_ms = poll_delay_ms;
        self
    }

    pub(crate) fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BankClient for MockBankClient {
    fn bank_name(&self) -> &BankName {
        &self.bank_name
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn submit(&self, _customer: &CustomerData) -> BankResult<String> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.submit_result.clone()
    }

    async fn poll(&self, _external_id: &str) -> BankResult<Option<BankVerdict>> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        if self.poll_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.poll_delay_ms)).await;
        }
        self.polls.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

pub(crate) fn registry(clients: &[Arc<MockBankClient>]) -> BankRegistry {
    BankRegistry::new(
        clients
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn BankClient>)
            .collect(),
    )
    .unwrap()
}

pub(crate) fn customer() -> CustomerData {
    CustomerData::builder("+37120000001", "alex@example.com", Decimal::new(5000, 0))
        .monthly_income(Decimal::new(3000, 0))
        .monthly_expenses(Decimal::new(800, 0))
        .marital_status(MaritalStatus::Single)
        .agree_to_be_scored(true)
        .build()
        .unwrap()
}

pub(crate) fn terms() -> OfferTerms {
    OfferTerms::new(
        Decimal::new(45_000, 2),
        Decimal::new(5400, 0),
        12,
        Decimal::new(125, 1),
        "2026-12-15".to_string(),
    )
}
