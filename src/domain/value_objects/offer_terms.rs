//! # Offer Terms
//!
//! Repayment terms of an approved offer. Banks send them as a group of
//! optional fields; [`OfferTerms::from_optional`] enforces that they are all
//! present or all absent.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Repayment terms of an approved offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    monthly_payment: Decimal,
    total_repayment: Decimal,
    number_of_payments: u32,
    annual_percentage_rate: Decimal,
    first_repayment_date: String,
}

impl OfferTerms {
    /// Creates a complete set of terms.
    #[must_use]
    pub fn new(
        monthly_payment: Decimal,
        total_repayment: Decimal,
        number_of_payments: u32,
        annual_percentage_rate: Decimal,
        first_repayment_date: impl Into<String>,
    ) -> Self {
        Self {
            monthly_payment,
            total_repayment,
            number_of_payments,
            annual_percentage_rate,
            first_repayment_date: first_repayment_date.into(),
        }
    }

    /// Builds terms from optional fields.
    ///
    /// Returns `Ok(None)` when every field is absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IncompleteOfferTerms` when only some fields are present.
    pub fn from_optional(
        monthly_payment: Option<Decimal>,
        total_repayment: Option<Decimal>,
        number_of_payments: Option<u32>,
        annual_percentage_rate: Option<Decimal>,
        first_repayment_date: Option<String>,
    ) -> DomainResult<Option<Self>> {
        match (
            monthly_payment,
            total_repayment,
            number_of_payments,
            annual_percentage_rate,
            first_repayment_date,
        ) {
            (Some(monthly), Some(total), Some(count), Some(apr), Some(first)) => {
                Ok(Some(Self::new(monthly, total, count, apr, first)))
            }
            (None, None, None, None, None) => Ok(None),
            (monthly, total, count, apr, first) => {
                let missing: Vec<&str> = [
                    ("monthlyPaymentAmount", monthly.is_none()),
                    ("totalRepaymentAmount", total.is_none()),
                    ("numberOfPayments", count.is_none()),
                    ("annualPercentageRate", apr.is_none()),
                    ("firstRepaymentDate", first.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(DomainError::IncompleteOfferTerms(format!(
                    "missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Returns the monthly payment amount.
    #[inline]
    #[must_use]
    pub fn monthly_payment(&self) -> Decimal {
        self.monthly_payment
    }

    /// Returns the total repayment amount.
    #[inline]
    #[must_use]
    pub fn total_repayment(&self) -> Decimal {
        self.total_repayment
    }

    /// Returns the number of payments.
    #[inline]
    #[must_use]
    pub fn number_of_payments(&self) -> u32 {
        self.number_of_payments
    }

    /// Returns the annual percentage rate.
    #[inline]
    #[must_use]
    pub fn annual_percentage_rate(&self) -> Decimal {
        self.annual_percentage_rate
    }

    /// Returns the first repayment date as sent by the bank.
    #[inline]
    #[must_use]
    pub fn first_repayment_date(&self) -> &str {
        &self.first_repayment_date
    }
}
