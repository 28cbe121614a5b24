//! # Bank Registry
//!
//! The statically configured set of bank clients, addressable by name.

use crate::domain::value_objects::BankName;
use crate::infrastructure::banks::error::BankError;
use crate::infrastructure::banks::fastbank::FastBankAdapter;
use crate::infrastructure::banks::solidbank::SolidBankAdapter;
use crate::infrastructure::banks::traits::BankClient;
use crate::infrastructure::config::{BankEndpointConfig, BanksConfig};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Error building a [`BankRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two clients report the same bank name.
    #[error("bank configured more than once: {0}")]
    DuplicateBank(BankName),

    /// No bank has a base URL.
    #[error("no bank configured")]
    NoBanks,

    /// An adapter could not be built.
    #[error("failed to build client for {bank}: {source}")]
    Client {
        /// Configuration section of the bank.
        bank: &'static str,
        /// Underlying error.
        source: BankError,
    },
}

/// Configured bank clients.
///
/// Names are unique, so a submission's bank name resolves to at most one client.
#[derive(Debug, Clone, Default)]
pub struct BankRegistry {
    clients: Vec<Arc<dyn BankClient>>,
}

impl BankRegistry {
    /// Creates a registry from `clients`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateBank` if two clients share a name.
    pub fn new(clients: Vec<Arc<dyn BankClient>>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for client in &clients {
            if !seen.insert(client.bank_name().clone()) {
                return Err(RegistryError::DuplicateBank(client.bank_name().clone()));
            }
        }
        Ok(Self { clients })
    }

    /// Builds the adapters for every bank with a base URL.
    ///
    /// Banks without a base URL are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NoBanks` if every bank is disabled and
    /// `RegistryError::Client` if an adapter cannot be built.
    pub fn from_config(config: &BanksConfig) -> Result<Self, RegistryError> {
        let mut clients: Vec<Arc<dyn BankClient>> = Vec::new();

        if let Some(endpoint) = enabled("fastbank", &config.fastbank) {
            let adapter = FastBankAdapter::new(&endpoint.base_url, endpoint.timeout_ms())
                .map_err(|source| RegistryError::Client { bank: "fastbank", source })?;
            clients.push(Arc::new(adapter));
        }
        if let Some(endpoint) = enabled("solidbank", &config.solidbank) {
            let adapter = SolidBankAdapter::new(&endpoint.base_url, endpoint.timeout_ms())
                .map_err(|source| RegistryError::Client { bank: "solidbank", source })?;
            clients.push(Arc::new(adapter));
        }

        if clients.is_empty() {
            return Err(RegistryError::NoBanks);
        }
        Self::new(clients)
    }

    /// Returns the client for `name`, if configured.
    #[must_use]
    pub fn get(&self, name: &BankName) -> Option<Arc<dyn BankClient>> {
        self.clients
            .iter()
            .find(|client| client.bank_name() == name)
            .cloned()
    }

    /// Returns all clients.
    #[must_use]
    pub fn clients(&self) -> &[Arc<dyn BankClient>] {
        &self.clients
    }

    /// Returns the configured bank names.
    #[must_use]
    pub fn names(&self) -> Vec<BankName> {
        self.clients.iter().map(|c| c.bank_name().clone()).collect()
    }

    /// Returns the number of configured banks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no bank is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

fn enabled<'a>(section: &str, endpoint: &'a BankEndpointConfig) -> Option<&'a BankEndpointConfig> {
    if endpoint.is_enabled() {
        Some(endpoint)
    } else {
        tracing::warn!(bank = section, "bank has no base_url, skipping");
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::banks::fastbank::FastBankAdapter;
    use crate::infrastructure::banks::solidbank::SolidBankAdapter;

    fn fastbank() -> Arc<dyn BankClient> {
        Arc::new(FastBankAdapter::new("http://fast.local", 1000).unwrap())
    }

    fn solidbank() -> Arc<dyn BankClient> {
        Arc::new(SolidBankAdapter::new("http://solid.local", 1000).unwrap())
    }

    #[test]
    fn resolves_by_name() {
        let registry = BankRegistry::new(vec![fastbank(), solidbank()]).unwrap();
        assert_eq!(registry.len(), 2);

        let client = registry.get(&BankName::new("SolidBank")).unwrap();
        assert_eq!(client.bank_name().as_str(), "SolidBank");
        assert!(registry.get(&BankName::new("NoBank")).is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = BankRegistry::new(vec![fastbank(), fastbank()]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBank(BankName::new("FastBank")));
    }

    mod from_config {
        use super::*;

        #[test]
        fn skips_disabled_banks() {
            let mut config = BanksConfig::default();
            config.solidbank.base_url = "http://solid.local".to_string();

            let registry = BankRegistry::from_config(&config).unwrap();
            assert_eq!(registry.names(), vec![BankName::new("SolidBank")]);
        }

        #[test]
        fn both_banks() {
            let mut config = BanksConfig::default();
            config.fastbank.base_url = "http://fast.local".to_string();
            config.fastbank.timeout_secs = 2;
            config.solidbank.base_url = "http://solid.local".to_string();

            let registry = BankRegistry::from_config(&config).unwrap();
            assert_eq!(registry.len(), 2);
            let fast = registry.get(&BankName::new("FastBank")).unwrap();
            assert_eq!(fast.timeout_ms(), 2000);
        }

        #[test]
        fn none_enabled_is_error() {
            let err = BankRegistry::from_config(&BanksConfig::default()).unwrap_err();
            assert_eq!(err, RegistryError::NoBanks);
        }
    }

    #[test]
    fn empty_registry() {
        let registry = BankRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
