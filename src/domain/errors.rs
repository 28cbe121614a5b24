//! # Domain Errors
//!
//! Errors raised by entity invariants and customer data validation.

use thiserror::Error;

/// Error raised by domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A status change the state machine does not allow.
    #[error("invalid {entity} state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Kind of entity being transitioned.
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// Offer terms were only partially supplied.
    #[error("incomplete offer terms: {0}")]
    IncompleteOfferTerms(String),
}

impl DomainError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Creates a state transition error.
    #[must_use]
    pub fn transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidStateTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
