//! HTTP client for forms API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the forms backend, handling URL construction, status classification,
//! and response parsing.

use super::error::ApiError;
use log::*;
use reqwest::Method;
use std::time::Duration;

/// Makes requests to the forms backend and returns parsed JSON or a
/// classified error.
///
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL with the per-request
    /// timeout applied to every call.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as reqwest::Client::builder().build() only fails on
    /// invalid configuration, which we don't use.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Make a request and return the parsed JSON body.
    ///
    /// Non-success statuses become `ApiError::Http` carrying the parsed (or
    /// raw text) body; transport failures become `ApiError::Network`; bodies
    /// that are not JSON become `ApiError::Validation`. An empty body (e.g.
    /// a 204 from DELETE) parses as JSON null.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let request_url = format!("{}/{}", self.base_url, path);
        debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            error!("Request to {} failed with status {}", request_url, status);
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                "Failed to parse response from {}: {}. Body: {}",
                request_url,
                e,
                String::from_utf8_lossy(&bytes)
            );
            ApiError::Validation(e.to_string())
        })
    }
}
