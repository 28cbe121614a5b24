//! # Bank Errors
//!
//! Error types for bank client operations.
//!
//! Errors fall into two classes:
//!
//! - **transport**: the bank could not be reached in time
//!   ([`BankError::Timeout`], [`BankError::Connection`])
//! - **protocol**: the bank answered with a non-success status or a payload
//!   that could not be understood (everything else except `Internal`)
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::infrastructure::banks::error::BankError;
//!
//! let error = BankError::timeout("request timed out after 5000ms");
//! assert!(error.is_transport());
//! assert!(error.is_retryable());
//!
//! let error = BankError::protocol("missing field `id`");
//! assert!(error.is_protocol());
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for bank client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// Request timed out.
    #[error("bank timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error, including 5xx answers.
    #[error("bank connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Undecodable or inconsistent payload.
    #[error("bank protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// The bank rejected the request as malformed.
    #[error("bank invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure.
    #[error("bank authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("bank rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Local failure unrelated to the bank, such as a client build error.
    #[error("bank client internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl BankError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the bank could not be reached.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }

    /// Returns true if the bank answered but the answer was unusable.
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Protocol { .. }
                | Self::InvalidRequest { .. }
                | Self::Authentication { .. }
                | Self::RateLimited { .. }
        )
    }

    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Reconciliation currently treats every poll failure as final; this is
    /// exposed for a bounded-retry policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns the retry delay in milliseconds, if applicable.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for bank operations.
pub type BankResult<T> = Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transport_and_retryable() {
        let error = BankError::timeout_with_duration("slow", 5000);
        assert!(error.is_transport());
        assert!(!error.is_protocol());
        assert!(error.is_retryable());
    }

    #[test]
    fn connection_is_transport() {
        assert!(BankError::connection("refused").is_transport());
    }

    #[test]
    fn protocol_class() {
        for error in [
            BankError::protocol("bad json"),
            BankError::invalid_request("400"),
            BankError::authentication("401"),
            BankError::rate_limited("429"),
        ] {
            assert!(error.is_protocol(), "{error}");
            assert!(!error.is_transport(), "{error}");
        }
    }

    #[test]
    fn internal_is_neither() {
        let error = BankError::internal("tls init");
        assert!(!error.is_transport());
        assert!(!error.is_protocol());
        assert!(!error.is_retryable());
    }

    #[test]
    fn display_format() {
        let display = BankError::timeout("request timed out").to_string();
        assert!(display.contains("timeout"));
        assert!(display.contains("request timed out"));
    }
}
