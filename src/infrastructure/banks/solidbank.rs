//! # SolidBank Adapter
//!
//! [`BankClient`] for SolidBank's REST API. Same resource layout as FastBank,
//! different request field names, and SolidBank also scores marital status.

use crate::domain::value_objects::{BankName, CustomerData, MaritalStatus};
use crate::infrastructure::banks::error::BankResult;
use crate::infrastructure::banks::http_client::{HttpClient, resource_url};
use crate::infrastructure::banks::traits::{BankClient, BankVerdict};
use crate::infrastructure::banks::wire::BankApplicationResponse;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// Name under which SolidBank submissions are recorded.
pub const SOLIDBANK_NAME: &str = "SolidBank";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolidBankApplicationRequest<'a> {
    phone: &'a str,
    email: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    monthly_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    monthly_expenses: Decimal,
    marital_status: MaritalStatus,
    agree_to_be_scored: bool,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

impl<'a> From<&'a CustomerData> for SolidBankApplicationRequest<'a> {
    fn from(customer: &'a CustomerData) -> Self {
        Self {
            phone: customer.phone(),
            email: customer.email(),
            monthly_income: customer.monthly_income(),
            monthly_expenses: customer.monthly_expenses(),
            marital_status: customer.marital_status(),
            agree_to_be_scored: customer.agree_to_be_scored(),
            amount: customer.amount(),
        }
    }
}

/// SolidBank client.
#[derive(Debug, Clone)]
pub struct SolidBankAdapter {
    bank_name: BankName,
    base_url: String,
    http: HttpClient,
}

impl SolidBankAdapter {
    /// Creates an adapter for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> BankResult<Self> {
        Ok(Self {
            bank_name: BankName::new(SOLIDBANK_NAME),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::new(timeout_ms)?,
        })
    }
}

#[async_trait]
impl BankClient for SolidBankAdapter {
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
            .post(&url, &SolidBankApplicationRequest::from(customer))
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
