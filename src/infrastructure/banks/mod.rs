//! # Bank Clients
//!
//! Integrations with the external banks.
//!
//! ## Port
//!
//! - [`BankClient`]: submit / poll capability of one bank
//!
//! ## Adapters
//!
//! - [`FastBankAdapter`], [`SolidBankAdapter`]: REST integrations
//! - [`HttpClient`]: shared reqwest wrapper with error mapping
//!
//! ## Wiring
//!
//! - [`BankRegistry`]: configured clients, looked up by bank name

pub mod error;
pub mod fastbank;
pub mod http_client;
pub mod registry;
pub mod solidbank;
pub mod traits;
pub mod wire;

pub use error::{BankError, BankResult};
pub use fastbank::FastBankAdapter;
pub use http_client::HttpClient;
pub use registry::{BankRegistry, RegistryError};
pub use solidbank::SolidBankAdapter;
pub use traits::{BankClient, BankVerdict};
