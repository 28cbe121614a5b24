//! # Offer Entity
//!
//! A bank's verdict on an application. Created once when a submission
//! resolves and immutable afterwards.

use crate::domain::value_objects::{
    ApplicationId, BankName, OfferId, OfferStatus, OfferTerms, Timestamp,
};
use serde::{Deserialize, Serialize};

/// A bank's verdict, with repayment terms when the bank supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    application_id: ApplicationId,
    bank_name: BankName,
    status: OfferStatus,
    terms: Option<OfferTerms>,
    created_at: Timestamp,
}

impl Offer {
    /// Creates an approved offer.
    #[must_use]
    pub fn approved(
        application_id: ApplicationId,
        bank_name: BankName,
        terms: Option<OfferTerms>,
    ) -> Self {
        Self {
            id: OfferId::new_v4(),
            application_id,
            bank_name,
            status: OfferStatus::Approved,
            terms,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a rejection; rejections never carry terms.
    #[must_use]
    pub fn rejected(application_id: ApplicationId, bank_name: BankName) -> Self {
        Self {
            id: OfferId::new_v4(),
            application_id,
            bank_name,
            status: OfferStatus::Rejected,
            terms: None,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstructs an offer from storage.
    #[must_use]
    pub fn from_parts(
        id: OfferId,
        application_id: ApplicationId,
        bank_name: BankName,
        status: OfferStatus,
        terms: Option<OfferTerms>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            application_id,
            bank_name,
            status,
            terms,
            created_at,
        }
    }

    /// Returns the offer ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the application this offer belongs to.
    #[inline]
    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the bank that made the offer.
    #[inline]
    #[must_use]
    pub fn bank_name(&self) -> &BankName {
        &self.bank_name
    }

    /// Returns the verdict.
    #[inline]
    #[must_use]
    pub fn status(&self) -> OfferStatus {
        self.status
    }

    /// Returns the repayment terms, if any.
    #[inline]
    #[must_use]
    pub fn terms(&self) -> Option<&OfferTerms> {
        self.terms.as_ref()
    }

    /// Returns when the offer was recorded.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true for approvals.
    #[inline]
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == OfferStatus::Approved
    }
}
