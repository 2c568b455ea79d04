//! Core types and trait definitions for the Clairière expedition service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod expedition;
pub mod expeditioner;
pub mod resolver;
pub mod store;
pub mod subscriber;

pub use error::{Result, StoreError};
