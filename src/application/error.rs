//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── NotFound { .. }             - Unknown application id
//! ├── Bank(BankError)             - Transport or protocol failure reaching a bank
//! ├── Persistence(RepositoryError) - Storage failure
//! ├── Configuration(String)       - Bank wiring inconsistency
//! ├── Domain(DomainError)         - Business rule violations
//! ├── Validation(String)          - Input validation failures
//! └── Internal(String)            - Anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::application::error::ApplicationError;
//!
//! let err = ApplicationError::not_found("Application", "0b7c...");
//! assert!(err.is_not_found());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::banks::{BankError, RegistryError};
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Bank call failed.
    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    /// Storage operation failed.
    #[error("persistence error: {0}")]
    Persistence(RepositoryError),

    /// Bank configuration is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the caller supplied bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Domain(DomainError::ValidationError(_))
        )
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound {
                resource_type: entity_type.to_string(),
                id,
            },
            other => Self::Persistence(other),
        }
    }
}

impl From<RegistryError> for ApplicationError {
    fn from(err: RegistryError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::BankName;

    #[test]
    fn not_found_display() {
        let err = ApplicationError::not_found("Application", "abc");
        assert_eq!(err.to_string(), "not found: Application with id abc");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn repository_not_found_becomes_not_found() {
        let err: ApplicationError = RepositoryError::not_found("Application", "abc").into();
        assert!(err.is_not_found());
    }

    #[test]
    fn repository_failure_becomes_persistence() {
        let err: ApplicationError = RepositoryError::connection("pool closed").into();
        assert!(matches!(err, ApplicationError::Persistence(_)));
        assert!(err.to_string().contains("pool closed"));
    }

    #[test]
    fn registry_error_becomes_configuration() {
        let err: ApplicationError =
            RegistryError::DuplicateBank(BankName::new("FastBank")).into();
        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(err.to_string().contains("FastBank"));
    }

    #[test]
    fn domain_validation_is_validation() {
        let err: ApplicationError = DomainError::validation("amount must be positive").into();
        assert!(err.is_validation());
        assert!(ApplicationError::validation("bad").is_validation());
    }

    #[test]
    fn bank_error_wraps() {
        let err: ApplicationError = BankError::timeout("slow").into();
        assert!(matches!(err, ApplicationError::Bank(_)));
    }
}
