//! # Identifiers
//!
//! Strongly typed identifiers for aggregator entities.
//!
//! - [`ApplicationId`], [`SubmissionId`], [`OfferId`]: UUID-based, assigned locally
//! - [`BankName`]: the identity of a configured bank client
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::value_objects::{ApplicationId, BankName};
//!
//! let id = ApplicationId::new_v4();
//! let parsed: ApplicationId = id.to_string().parse().unwrap();
//! assert_eq!(id, parsed);
//!
//! assert_eq!(BankName::new("FastBank").as_str(), "FastBank");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wraps an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID.
            #[inline]
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a customer financing application.
    ApplicationId
);

uuid_id!(
    /// Identifier of one bank submission row.
    SubmissionId
);

uuid_id!(
    /// Identifier of an offer received from a bank.
    OfferId
);

/// Name of a bank, used to pair a submission with its client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankName(String);

impl BankName {
    /// Creates a bank name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BankName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for BankName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
