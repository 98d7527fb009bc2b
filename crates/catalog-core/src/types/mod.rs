//! Core type definitions used across the catalog client workspace.

pub mod id;

pub use id::*;
