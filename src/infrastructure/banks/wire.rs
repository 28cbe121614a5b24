//! # Bank Wire Format
//!
//! Response shape shared by the bank APIs: `{id, status, offer?}`.
//!
//! A bank reports `PROCESSED` once it reached a verdict. At that point an
//! `offer` object means approval and its absence means rejection. Any other
//! status means the bank is still working.

use crate::domain::value_objects::OfferTerms;
use crate::infrastructure::banks::error::{BankError, BankResult};
use crate::infrastructure::banks::traits::BankVerdict;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Status a bank reports once its verdict is final.
pub const PROCESSED_STATUS: &str = "PROCESSED";

/// Application resource returned by submit and poll calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankApplicationResponse {
    /// The bank's tracking id.
    #[serde(default)]
    pub id: String,
    /// The bank's processing status.
    #[serde(default)]
    pub status: String,
    /// Offer, present once approved.
    #[serde(default)]
    pub offer: Option<BankOfferPayload>,
}

/// Offer object as sent by the banks; every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankOfferPayload {
    /// Monthly payment amount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly_payment_amount: Option<Decimal>,
    /// Total repayment amount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_repayment_amount: Option<Decimal>,
    /// Number of payments.
    #[serde(default)]
    pub number_of_payments: Option<u32>,
    /// Annual percentage rate.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub annual_percentage_rate: Option<Decimal>,
    /// First repayment date.
    #[serde(default)]
    pub first_repayment_date: Option<String>,
}

impl BankApplicationResponse {
    /// Extracts the tracking id of a submit response.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Protocol` if the id is empty.
    pub fn into_external_id(self) -> BankResult<String> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(BankError::protocol("submit response carried no application id"));
        }
        Ok(id.to_string())
    }

    /// Interprets a poll response.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Protocol` if the offer terms are only partially present.
    pub fn into_verdict(self) -> BankResult<Option<BankVerdict>> {
        if !self.status.eq_ignore_ascii_case(PROCESSED_STATUS) {
            return Ok(None);
        }

        match self.offer {
            None => Ok(Some(BankVerdict::Rejected)),
            Some(offer) => {
                let terms = OfferTerms::from_optional(
                    offer.monthly_payment_amount,
                    offer.total_repayment_amount,
                    offer.number_of_payments,
                    offer.annual_percentage_rate,
                    offer.first_repayment_date,
                )
                .map_err(|e| BankError::protocol(e.to_string()))?;
                Ok(Some(BankVerdict::Approved(terms)))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> BankApplicationResponse {
        serde_json::from_value(json).unwrap()
    }

    mod verdicts {
        use super::*;

        #[test]
        fn non_processed_is_absent() {
            for status in ["DRAFT", "PENDING", "IN_REVIEW", ""] {
                let response = parse(serde_json::json!({"id": "a", "status": status}));
                assert!(response.into_verdict().unwrap().is_none(), "{status}");
            }
        }

        #[test]
        fn processed_without_offer_is_rejection() {
            let response = parse(serde_json::json!({"id": "a", "status": "PROCESSED"}));
            assert_eq!(response.into_verdict().unwrap(), Some(BankVerdict::Rejected));
        }

        #[test]
        fn processed_with_full_offer_is_approval() {
            let response = parse(serde_json::json!({
                "id": "a",
                "status": "PROCESSED",
                "offer": {
                    "monthlyPaymentAmount": 91.5,
                    "totalRepaymentAmount": 1098.0,
                    "numberOfPayments": 12,
                    "annualPercentageRate": 17.9,
                    "firstRepaymentDate": "2026-05-01"
                }
            }));

            let Some(BankVerdict::Approved(Some(terms))) = response.into_verdict().unwrap() else {
                panic!("expected approval with terms");
            };
            assert_eq!(terms.monthly_payment(), Decimal::new(915, 1));
            assert_eq!(terms.number_of_payments(), 12);
            assert_eq!(terms.first_repayment_date(), "2026-05-01");
        }

        #[test]
        fn empty_offer_object_is_approval_without_terms() {
            let response = parse(serde_json::json!({"id": "a", "status": "PROCESSED", "offer": {}}));
            assert_eq!(
                response.into_verdict().unwrap(),
                Some(BankVerdict::Approved(None))
            );
        }

        #[test]
        fn partial_offer_is_protocol_error() {
            let response = parse(serde_json::json!({
                "id": "a",
                "status": "PROCESSED",
                "offer": {"monthlyPaymentAmount": 10.0}
            }));
            let err = response.into_verdict().unwrap_err();
            assert!(err.is_protocol());
        }
    }

    #[test]
    fn empty_id_is_protocol_error() {
        let response = parse(serde_json::json!({"status": "DRAFT"}));
        assert!(response.into_external_id().unwrap_err().is_protocol());
    }

    #[test]
    fn id_is_trimmed() {
        let response = parse(serde_json::json!({"id": " fb-7 ", "status": "DRAFT"}));
        assert_eq!(response.into_external_id().unwrap(), "fb-7");
    }
}
