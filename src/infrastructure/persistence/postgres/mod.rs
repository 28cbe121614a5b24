//! # PostgreSQL Persistence
//!
//! sqlx-backed implementation of the repository ports.

pub mod store;

pub use store::PostgresStore;
