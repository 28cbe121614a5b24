//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! Every operation touches a single entity, except
//! [`BankSubmissionRepository::create_batch`], which writes the submissions of
//! one fan-out atomically so no reader ever observes a partial batch.
//!
//! # Available Repositories
//!
//! - [`ApplicationRepository`]: applications, loaded with their children
//! - [`BankSubmissionRepository`]: per-bank submissions
//! - [`OfferRepository`]: bank offers
//!
//! Applications are never deleted, so "check the application exists, then
//! write a child row" cannot race with a deletion.
//!
//! # Examples
//!
//! ```ignore
//! use offer_aggregator::infrastructure::persistence::traits::ApplicationRepository;
//! use offer_aggregator::domain::value_objects::ApplicationStatus;
//!
//! async fn in_flight(repo: &impl ApplicationRepository) {
//!     let processing = repo.find_by_status(ApplicationStatus::Processing).await.unwrap();
//!     println!("{} applications awaiting banks", processing.len());
//! }
//! ```

use crate::domain::entities::{Application, BankSubmission, Offer};
use crate::domain::value_objects::{ApplicationId, ApplicationStatus};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for application aggregates.
#[async_trait]
pub trait ApplicationRepository: Send + Sync + fmt::Debug {
    /// Inserts a new application (children are ignored).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the id is taken.
    async fn create(&self, application: &Application) -> RepositoryResult<()>;

    /// Gets an application with its submissions and offers.
    ///
    /// Returns `None` if the application does not exist.
    async fn get(&self, id: &ApplicationId) -> RepositoryResult<Option<Application>>;

    /// Persists the status and `updated_at` of an existing application.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the application does not exist.
    async fn update(&self, application: &Application) -> RepositoryResult<()>;

    /// Returns true if an application with this id exists.
    async fn exists(&self, id: &ApplicationId) -> RepositoryResult<bool>;

    /// Finds applications in `status`, loaded with their submissions.
    ///
    /// Offers are not loaded.
    async fn find_by_status(&self, status: ApplicationStatus)
    -> RepositoryResult<Vec<Application>>;
}

/// Repository for bank submissions.
#[async_trait]
pub trait BankSubmissionRepository: Send + Sync + fmt::Debug {
    /// Inserts one submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owning application does not
    /// exist, `RepositoryError::Duplicate` if the application already has a
    /// submission for the same bank.
    async fn create(&self, submission: &BankSubmission) -> RepositoryResult<()>;

    /// Inserts all submissions of one fan-out, all or nothing.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create); on error nothing is written.
    async fn create_batch(&self, submissions: &[BankSubmission]) -> RepositoryResult<()>;

    /// Persists the status, completion time and error of a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the submission does not exist.
    async fn update(&self, submission: &BankSubmission) -> RepositoryResult<()>;

    /// Returns every submission of an application.
    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<BankSubmission>>;
}

/// Repository for offers.
#[async_trait]
pub trait OfferRepository: Send + Sync + fmt::Debug {
    /// Inserts an offer. An application holds at most one offer per bank.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owning application does not exist,
    /// `RepositoryError::Duplicate` if the bank already has an offer for it.
    async fn create(&self, offer: &Offer) -> RepositoryResult<()>;

    /// Returns every offer of an application.
    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<Offer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repository_error {
        use super::*;

        #[test]
        fn not_found_error() {
            let err = RepositoryError::not_found("Application", "app-123");
            assert!(err.is_not_found());
            assert!(!err.is_duplicate());
            assert!(err.to_string().contains("not found"));
            assert!(err.to_string().contains("Application"));
            assert!(err.to_string().contains("app-123"));
        }

        #[test]
        fn duplicate_error() {
            let err = RepositoryError::duplicate("BankSubmission", "app-1/FastBank");
            assert!(err.is_duplicate());
            assert!(!err.is_not_found());
            assert!(err.to_string().contains("already exists"));
        }

        #[test]
        fn query_error() {
            let err = RepositoryError::query("syntax error at or near");
            assert!(err.to_string().contains("Query error"));
        }
    }
}
