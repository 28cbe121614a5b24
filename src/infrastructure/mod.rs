//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`banks`]: bank API clients and their registry
//! - [`persistence`]: repository ports and their in-memory / PostgreSQL stores
//! - [`config`]: layered process configuration
//! - [`logging`]: tracing subscriber setup

pub mod banks;
pub mod config;
pub mod logging;
pub mod persistence;
