//! Authenticated user profile.

use serde::{Deserialize, Serialize};

use catalog_core::types::UserId;

/// The authenticated catalog user, as served by `/users/me`.
///
/// Only the identifier is required; the subscriber needs it to derive the
/// per-user notification topic. Profile fields are kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Role string, e.g. `"STUDENT"` or `"PROFESSOR"`.
    #[serde(default)]
    pub role: Option<String>,
}
