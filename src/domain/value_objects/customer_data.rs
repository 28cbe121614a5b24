//! # Customer Data
//!
//! The customer-supplied part of a financing application, validated once at
//! intake and forwarded unchanged to every bank.
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::value_objects::{CustomerData, MaritalStatus};
//! use rust_decimal::Decimal;
//!
//! let data = CustomerData::builder("+37120000000", "jane@example.com", Decimal::new(5000, 0))
//!     .monthly_income(Decimal::new(2500, 0))
//!     .monthly_expenses(Decimal::new(800, 0))
//!     .marital_status(MaritalStatus::Married)
//!     .dependents(2)
//!     .agree_to_be_scored(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(data.dependents(), 2);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::MaritalStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validated customer data of an application.
///
/// # Invariants
///
/// - Phone is non-empty
/// - Email is well-formed
/// - Monthly income and expenses are non-negative
/// - Requested amount is positive
/// - The customer agreed to be scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    phone: String,
    email: String,
    monthly_income: Decimal,
    monthly_expenses: Decimal,
    marital_status: MaritalStatus,
    agree_to_be_scored: bool,
    amount: Decimal,
    dependents: u32,
}

impl CustomerData {
    /// Starts a builder with the fields that have no sensible default.
    pub fn builder(
        phone: impl Into<String>,
        email: impl Into<String>,
        amount: Decimal,
    ) -> CustomerDataBuilder {
        CustomerDataBuilder::new(phone, email, amount)
    }

    /// Reconstructs customer data from storage without validation.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        phone: String,
        email: String,
        monthly_income: Decimal,
        monthly_expenses: Decimal,
        marital_status: MaritalStatus,
        agree_to_be_scored: bool,
        amount: Decimal,
        dependents: u32,
    ) -> Self {
        Self {
            phone,
            email,
            monthly_income,
            monthly_expenses,
            marital_status,
            agree_to_be_scored,
            amount,
            dependents,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if !is_well_formed_email(&self.email) {
            return Err(DomainError::validation("email is not a valid address"));
        }
        if self.monthly_income < Decimal::ZERO {
            return Err(DomainError::validation("monthly income must not be negative"));
        }
        if self.monthly_expenses < Decimal::ZERO {
            return Err(DomainError::validation(
                "monthly expenses must not be negative",
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        if !self.agree_to_be_scored {
            return Err(DomainError::validation(
                "customer must agree to be scored",
            ));
        }
        Ok(())
    }

    /// Returns the phone number.
    #[inline]
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the email address.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the monthly income.
    #[inline]
    #[must_use]
    pub fn monthly_income(&self) -> Decimal {
        self.monthly_income
    }

    /// Returns the monthly expenses.
    #[inline]
    #[must_use]
    pub fn monthly_expenses(&self) -> Decimal {
        self.monthly_expenses
    }

    /// Returns the marital status.
    #[inline]
    #[must_use]
    pub fn marital_status(&self) -> MaritalStatus {
        self.marital_status
    }

    /// Returns true if the customer consented to scoring.
    #[inline]
    #[must_use]
    pub fn agree_to_be_scored(&self) -> bool {
        self.agree_to_be_scored
    }

    /// Returns the requested amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the number of dependents.
    #[inline]
    #[must_use]
    pub fn dependents(&self) -> u32 {
        self.dependents
    }
}

/// Checks for `local@domain.tld` shape: one `@`, non-empty local part, and a
/// dotted domain without empty labels or whitespace.
fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Builder for [`CustomerData`].
#[must_use = "builders do nothing unless .build() is called"]
#[derive(Debug, Clone)]
pub struct CustomerDataBuilder {
    phone: String,
    email: String,
    monthly_income: Decimal,
    monthly_expenses: Decimal,
    marital_status: MaritalStatus,
    agree_to_be_scored: bool,
    amount: Decimal,
    dependents: u32,
}

impl CustomerDataBuilder {
    /// Creates a builder with required fields; the rest default to zero,
    /// `SINGLE` and no consent.
    pub fn new(phone: impl Into<String>, email: impl Into<String>, amount: Decimal) -> Self {
        Self {
            phone: phone.into(),
            email: email.into(),
            monthly_income: Decimal::ZERO,
            monthly_expenses: Decimal::ZERO,
            marital_status: MaritalStatus::Single,
            agree_to_be_scored: false,
            amount,
            dependents: 0,
        }
    }

    /// Sets the monthly income.
    pub fn monthly_income(mut self, income: Decimal) -> Self {
        self.monthly_income = income;
        self
    }

    /// Sets the monthly expenses.
    pub fn monthly_expenses(mut self, expenses: Decimal) -> Self {
        self.monthly_expenses = expenses;
        self
    }

    /// Sets the marital status.
    pub fn marital_status(mut self, status: MaritalStatus) -> Self {
        self.marital_status = status;
        self
    }

    /// Sets the scoring consent flag.
    pub fn agree_to_be_scored(mut self, agree: bool) -> Self {
        self.agree_to_be_scored = agree;
        self
    }

    /// Sets the number of dependents.
    pub fn dependents(mut self, dependents: u32) -> Self {
        self.dependents = dependents;
        self
    }

    /// Validates and builds the customer data.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` naming the first violated rule.
    pub fn build(self) -> DomainResult<CustomerData> {
        let data = CustomerData {
            phone: self.phone,
            email: self.email,
            monthly_income: self.monthly_income,
            monthly_expenses: self.monthly_expenses,
            marital_status: self.marital_status,
            agree_to_be_scored: self.agree_to_be_scored,
            amount: self.amount,
            dependents: self.dependents,
        };
        data.validate()?;
        Ok(data)
    }
}
