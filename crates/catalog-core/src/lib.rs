//! # catalog-core
//!
//! Core crate for the catalog notification client. Contains configuration
//! schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other catalog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::ClientError;
pub use result::ClientResult;
