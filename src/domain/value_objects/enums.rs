//! # Domain Enums
//!
//! Status and classification enums of the aggregator.
//!
//! - [`ApplicationStatus`] - lifecycle of a customer application
//! - [`SubmissionStatus`] - lifecycle of one bank submission
//! - [`OfferStatus`] - a bank's verdict
//! - [`MaritalStatus`] - customer-supplied marital status
//!
//! All enums implement `Display` and `FromStr` using the SCREAMING_SNAKE_CASE
//! wire names also used by serde and the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The value does not name any variant.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Status of a customer application.
///
/// ```text
/// Pending → Processing → Completed
///              ↓
///            Failed
/// ```
///
/// # Examples
///
/// ```
/// use offer_aggregator::domain::value_objects::ApplicationStatus;
///
/// assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Processing));
/// assert!(!ApplicationStatus::Completed.can_transition_to(ApplicationStatus::Processing));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Persisted, not yet handed to the banks.
    #[default]
    Pending,
    /// Submitted to the banks, waiting for verdicts.
    Processing,
    /// Every bank submission has left draft (terminal).
    Completed,
    /// Abandoned (terminal).
    Failed,
}

impl ApplicationStatus {
    /// Returns true for statuses that never change again.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the state machine allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(ParseEnumError::InvalidValue(
                "ApplicationStatus",
                s.to_string(),
            )),
        }
    }
}

/// Status of a single bank submission.
///
/// A submission starts as `Draft` once the bank acknowledged it, and leaves
/// draft exactly once. It never re-enters `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Acknowledged by the bank, verdict outstanding.
    Draft,
    /// The bank delivered a verdict (terminal).
    Success,
    /// Submit or poll failed (terminal).
    Failed,
}

impl SubmissionStatus {
    /// Returns true once the submission has left draft.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Draft)
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(ParseEnumError::InvalidValue(
                "SubmissionStatus",
                s.to_string(),
            )),
        }
    }
}

/// A bank's verdict on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    /// The bank offers financing.
    Approved,
    /// The bank declined.
    Rejected,
}

impl OfferStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(ParseEnumError::InvalidValue("OfferStatus", s.to_string())),
        }
    }
}

/// Marital status declared by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    /// Single.
    Single,
    /// Married.
    Married,
    /// Divorced.
    Divorced,
    /// Widowed.
    Widowed,
    /// Living together without being married.
    Cohabiting,
}

impl MaritalStatus {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Married => "MARRIED",
            Self::Divorced => "DIVORCED",
            Self::Widowed => "WIDOWED",
            Self::Cohabiting => "COHABITING",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaritalStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SINGLE" => Ok(Self::Single),
            "MARRIED" => Ok(Self::Married),
            "DIVORCED" => Ok(Self::Divorced),
            "WIDOWED" => Ok(Self::Widowed),
            "COHABITING" => Ok(Self::Cohabiting),
            _ => Err(ParseEnumError::InvalidValue("MaritalStatus", s.to_string())),
        }
    }
}
