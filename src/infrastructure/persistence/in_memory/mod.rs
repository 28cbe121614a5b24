//! # In-Memory Persistence
//!
//! In-memory implementation used by tests and when no database is configured.
//!
//! ## Thread Safety
//!
//! [`InMemoryStore`] keeps all entities behind one `Arc<RwLock<..>>`.

pub mod store;

pub use store::InMemoryStore;
