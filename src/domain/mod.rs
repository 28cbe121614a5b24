//! # Domain Layer
//!
//! Entities, value objects and pure rules of the offer aggregator. Nothing in
//! this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
