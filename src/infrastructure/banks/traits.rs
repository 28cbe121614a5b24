//! # Bank Client Trait
//!
//! Port definition for bank integrations.
//!
//! Every bank is reached through [`BankClient`]: it accepts an application
//! (`submit`), hands back a tracking id, and later reports a verdict when
//! asked (`poll`). Nothing bank-specific leaks past this trait; the fan-out
//! and the reconciliation loop only ever see `dyn BankClient`.
//!
//! # Examples
//!
//! ```ignore
//! use offer_aggregator::infrastructure::banks::traits::{BankClient, BankVerdict};
//!
//! async fn check(bank: &dyn BankClient, external_id: &str) {
//!     match bank.poll(external_id).await {
//!         Ok(Some(BankVerdict::Approved(_))) => println!("approved"),
//!         Ok(Some(BankVerdict::Rejected)) => println!("rejected"),
//!         Ok(None) => println!("still processing"),
//!         Err(e) => println!("failed: {e}"),
//!     }
//! }
//! ```

use crate::domain::entities::Offer;
use crate::domain::value_objects::{
    ApplicationId, BankName, CustomerData, OfferStatus, OfferTerms,
};
use crate::infrastructure::banks::error::BankResult;
use async_trait::async_trait;
use std::fmt;

/// A bank's terminal answer to an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankVerdict {
    /// The bank offers financing, with terms when it sent them.
    Approved(Option<OfferTerms>),
    /// The bank declined.
    Rejected,
}

impl BankVerdict {
    /// Returns the offer status this verdict maps to.
    #[must_use]
    pub fn status(&self) -> OfferStatus {
        match self {
            Self::Approved(_) => OfferStatus::Approved,
            Self::Rejected => OfferStatus::Rejected,
        }
    }

    /// Turns the verdict into an offer for `application_id`.
    #[must_use]
    pub fn into_offer(self, application_id: ApplicationId, bank_name: BankName) -> Offer {
        match self {
            Self::Approved(terms) => Offer::approved(application_id, bank_name, terms),
            Self::Rejected => Offer::rejected(application_id, bank_name),
        }
    }
}

impl fmt::Display for BankVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// Trait defining the interface for bank clients.
///
/// # Error Handling
///
/// Methods return `BankResult<T>`. Implementations map transport problems to
/// `BankError::Timeout`/`BankError::Connection` and unusable answers to the
/// protocol variants. Callers do not retry within a single call.
#[async_trait]
pub trait BankClient: Send + Sync + fmt::Debug {
    /// Returns the bank's name; submissions are matched to clients by it.
    fn bank_name(&self) -> &BankName;

    /// Returns the timeout in milliseconds for a single call.
    fn timeout_ms(&self) -> u64;

    /// Submits an application and returns the bank's tracking id.
    ///
    /// # Errors
    ///
    /// - `BankError::Timeout` / `BankError::Connection` - bank unreachable
    /// - `BankError::Protocol` - answer undecodable or without an id
    async fn submit(&self, customer: &CustomerData) -> BankResult<String>;

    /// Asks for the verdict on a previously submitted application.
    ///
    /// Returns `Ok(None)` while the bank is still processing.
    ///
    /// # Errors
    ///
    /// - `BankError::Timeout` / `BankError::Connection` - bank unreachable
    /// - `BankError::Protocol` - answer undecodable or inconsistent
    async fn poll(&self, external_id: &str) -> BankResult<Option<BankVerdict>>;
}
