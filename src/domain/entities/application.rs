//! # Application Aggregate Root
//!
//! A customer's financing application together with its bank submissions and
//! the offers received so far.
//!
//! # State Machine
//!
//! ```text
//! Pending → Processing → Completed
//!     ↓          ↓
//!     └──────────┴─────→ Failed
//! ```
//!
//! `Pending → Processing` happens when the application is handed to the banks;
//! `Processing → Completed` once no submission remains in draft.
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::entities::Application;
//! use offer_aggregator::domain::value_objects::{ApplicationStatus, CustomerData};
//! use rust_decimal::Decimal;
//!
//! let customer = CustomerData::builder("+37120000000", "jane@example.com", Decimal::new(500, 0))
//!     .agree_to_be_scored(true)
//!     .build()
//!     .unwrap();
//!
//! let mut application = Application::new(customer);
//! assert_eq!(application.status(), ApplicationStatus::Pending);
//!
//! application.start_processing().unwrap();
//! assert_eq!(application.status(), ApplicationStatus::Processing);
//! ```

use crate::domain::entities::bank_submission::BankSubmission;
use crate::domain::entities::offer::Offer;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::status_aggregator;
use crate::domain::value_objects::{ApplicationId, ApplicationStatus, CustomerData, Timestamp};
use serde::{Deserialize, Serialize};

/// Financing application aggregate root.
///
/// # Invariants
///
/// - Status changes follow [`ApplicationStatus::can_transition_to`]
/// - Submissions and offers belong to this application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    customer: CustomerData,
    status: ApplicationStatus,
    submissions: Vec<BankSubmission>,
    offers: Vec<Offer>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Application {
    /// Creates a pending application with a fresh id.
    #[must_use]
    pub fn new(customer: CustomerData) -> Self {
        let now = Timestamp::now();
        Self {
            id: ApplicationId::new_v4(),
            customer,
            status: ApplicationStatus::Pending,
            submissions: Vec::new(),
            offers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs an application from storage, without children.
    #[must_use]
    pub fn from_parts(
        id: ApplicationId,
        customer: CustomerData,
        status: ApplicationStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            customer,
            status,
            submissions: Vec::new(),
            offers: Vec::new(),
            created_at,
            updated_at,
        }
    }

    /// Attaches loaded submissions.
    #[must_use]
    pub fn with_submissions(mut self, submissions: Vec<BankSubmission>) -> Self {
        self.submissions = submissions;
        self
    }

    /// Attaches loaded offers.
    #[must_use]
    pub fn with_offers(mut self, offers: Vec<Offer>) -> Self {
        self.offers = offers;
        self
    }

    /// Moves the application to `Processing`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the application is pending.
    pub fn start_processing(&mut self) -> DomainResult<()> {
        self.transition_to(ApplicationStatus::Processing)
    }

    /// Moves the application to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the application is processing.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition_to(ApplicationStatus::Completed)
    }

    /// Moves the application to `Failed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the application is already terminal.
    pub fn fail(&mut self) -> DomainResult<()> {
        self.transition_to(ApplicationStatus::Failed)
    }

    fn transition_to(&mut self, target: ApplicationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::transition("application", self.status, target));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Status implied by the current submissions.
    #[must_use]
    pub fn derived_status(&self) -> ApplicationStatus {
        status_aggregator::aggregate(self.submissions.iter().map(BankSubmission::status))
    }

    /// Returns true when every submission left draft and there is at least one.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.derived_status() == ApplicationStatus::Completed
    }

    // ========== Accessors ==========

    /// Returns the application ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the customer data.
    #[inline]
    #[must_use]
    pub fn customer(&self) -> &CustomerData {
        &self.customer
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns the loaded submissions.
    #[inline]
    #[must_use]
    pub fn submissions(&self) -> &[BankSubmission] {
        &self.submissions
    }

    /// Returns the submissions mutably, for reconciliation.
    #[inline]
    pub fn submissions_mut(&mut self) -> &mut [BankSubmission] {
        &mut self.submissions
    }

    /// Returns the loaded offers.
    #[inline]
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Returns when the application was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the application last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
