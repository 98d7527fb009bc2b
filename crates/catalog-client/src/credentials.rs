//! Bearer credential seam.

use std::fmt;

use async_trait::async_trait;

/// Source of the bearer token attached to REST and WebSocket requests.
///
/// Kept behind a trait so callers can plug in refreshing token stores.
/// The client itself never persists credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Return the current bearer token, if one is available.
    async fn bearer_token(&self) -> Option<String>;
}

/// A fixed bearer token supplied at construction time.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap a literal token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    // The token must not leak into logs through Debug formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// No credential at all; requests go out unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

#[async_trait]
impl CredentialProvider for Anonymous {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_returns_its_token() {
        let provider = StaticToken::new("abc123");
        assert_eq!(provider.bearer_token().await.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_anonymous_returns_none() {
        assert_eq!(Anonymous.bearer_token().await, None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let provider = StaticToken::new("super-secret");
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
