//! # catalog-entity
//!
//! Domain entity models for the catalog notification client. Every struct
//! in this crate mirrors a JSON payload exchanged with the catalog backend
//! and derives `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod notification;
pub mod time;
pub mod user;
