//! # catalog-client
//!
//! REST access layer for the catalog backend: identity resolution, the
//! notification snapshot endpoint, and the mutation endpoints. The
//! [`backend::NotificationBackend`] trait is the seam the realtime session
//! is built and tested against.

pub mod backend;
pub mod credentials;
pub mod http;
pub mod rest;

pub use backend::NotificationBackend;
pub use credentials::{CredentialProvider, StaticToken};
pub use http::ApiClient;
pub use rest::RestBackend;
