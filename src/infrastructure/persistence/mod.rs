//! # Persistence Layer
//!
//! Repository ports and their implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`ApplicationRepository`]: applications with their children
//! - [`BankSubmissionRepository`]: per-bank submissions
//! - [`OfferRepository`]: bank offers
//!
//! ## Implementations
//!
//! - `in_memory`: [`InMemoryStore`], for tests and database-less runs
//! - `postgres`: [`PostgresStore`], sqlx over PostgreSQL

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use traits::{
    ApplicationRepository, BankSubmissionRepository, OfferRepository, RepositoryError,
    RepositoryResult,
};
