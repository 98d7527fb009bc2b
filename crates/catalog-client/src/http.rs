//! Thin wrapper around `reqwest` for the catalog REST API.
//!
//! Owns base-URL joining, bearer injection, and the mapping from HTTP
//! failures into [`ClientError`] kinds.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use catalog_core::ClientResult;
use catalog_core::config::api::ApiConfig;
use catalog_core::error::{ClientError, ErrorKind};

use crate::credentials::CredentialProvider;

/// HTTP client for the catalog backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialProvider>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                ClientError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::GET, path).await?;
        response.json::<T>().await.map_err(|e| {
            ClientError::with_source(
                ErrorKind::Serialization,
                format!("Invalid JSON in response from {path}"),
                e,
            )
        })
    }

    /// PUT with an empty body, discarding any response body.
    pub async fn put_empty(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::PUT, path).await.map(|_| ())
    }

    /// DELETE, discarding any response body.
    pub async fn delete_empty(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::DELETE, path).await.map(|_| ())
    }

    async fn execute(&self, method: Method, path: &str) -> ClientResult<reqwest::Response> {
        let url = self.url(path);
        debug!(%method, %url, "API request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.credentials.bearer_token().await {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(path, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(status_error(status, path))
        }
    }
}

/// Map a non-success HTTP status onto a [`ClientError`].
fn status_error(status: StatusCode, path: &str) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ClientError::authentication(format!("Request to {path} rejected with {status}"))
        }
        StatusCode::NOT_FOUND => {
            ClientError::not_found(format!("Resource at {path} no longer exists"))
        }
        _ => ClientError::network(format!("Server returned {status} for {path}")),
    }
}

/// Map a reqwest transport failure onto a [`ClientError`].
fn transport_error(path: &str, err: reqwest::Error) -> ClientError {
    let message = if err.is_timeout() {
        format!("Request to {path} timed out")
    } else if err.is_connect() {
        format!("Could not connect to the backend for {path}")
    } else {
        format!("Request to {path} failed")
    };
    ClientError::with_source(ErrorKind::Network, message, err)
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
