//! # FastBank Adapter
//!
//! [`BankClient`] for FastBank's REST API.
//!
//! - `POST {base}/applications` submits an application
//! - `GET {base}/applications/{id}` reports its status and offer

use crate::domain::value_objects::{BankName, CustomerData};
use crate::infrastructure::banks::error::BankResult;
use crate::infrastructure::banks::http_client::{HttpClient, resource_url};
use crate::infrastructure::banks::traits::{BankClient, BankVerdict};
use crate::infrastructure::banks::wire::BankApplicationResponse;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// Name under which FastBank submissions are recorded.
pub const FASTBANK_NAME: &str = "FastBank";

/// FastBank's application request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FastBankApplicationRequest<'a> {
    phone_number: &'a str,
    email: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    monthly_income_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    monthly_credit_liabilities: Decimal,
    dependents: u32,
    agree_to_data_sharing: bool,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

impl<'a> From<&'a CustomerData> for FastBankApplicationRequest<'a> {
    fn from(customer: &'a CustomerData) -> Self {
        Self {
            phone_number: customer.phone(),
            email: customer.email(),
            monthly_income_amount: customer.monthly_income(),
            monthly_credit_liabilities: customer.monthly_expenses(),
            dependents: customer.dependents(),
            agree_to_data_sharing: customer.agree_to_be_scored(),
            amount: customer.amount(),
        }
    }
}

/// FastBank client.
#[derive(Debug, Clone)]
pub struct FastBankAdapter {
    bank_name: BankName,
    base_url: String,
    http: HttpClient,
}

impl FastBankAdapter {
    /// Creates an adapter for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> BankResult<Self> {
        Ok(Self {
            bank_name: BankName::new(FASTBANK_NAME),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::new(timeout_ms)?,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BankClient for FastBankAdapter {
    fn bank_name(&self) -> &BankName {
        &self.bank_name
    }

    fn timeout_ms(&self) -> u64 {
        self.http.timeout_ms()
    }

    async fn submit(&self, customer: &CustomerData) -> BankResult<String> {
        let url = resource_url(&self.base_url, &["applications"])?;
        let response: BankApplicationResponse = self
            .http
            .post(&url, &FastBankApplicationRequest::from(customer))
            .await?;

        tracing::debug!(bank = %self.bank_name, external_id = %response.id, status = %response.status, "application submitted");
        response.into_external_id()
    }

    async fn poll(&self, external_id: &str) -> BankResult<Option<BankVerdict>> {
        let url = resource_url(&self.base_url, &["applications", external_id])?;
        let response: BankApplicationResponse = self.http.get(&url).await?;

        tracing::debug!(bank = %self.bank_name, external_id, status = %response.status, "application status retrieved");
        response.into_verdict()
    }
}
