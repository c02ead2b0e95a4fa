mod client;
mod error;
pub mod resource;

pub use error::ApiError;

use crate::config::{Config, ConfigError};
use client::Client;
use log::*;
use reqwest::Method;
use resource::{FormResource, SaveFormBody};
use serde_json::json;
use std::time::Duration;

/// Responsible for asynchronous interaction with the forms backend including
/// transformation of response data into explicitly-defined types.
///
pub struct FormsApi {
    client: Client,
}

impl FormsApi {
    /// Returns a new instance for the given base URL and request timeout.
    ///
    pub fn new(base_url: &str, timeout: Duration) -> FormsApi {
        debug!("Initializing forms API client for {}...", base_url);
        FormsApi {
            client: Client::new(base_url, timeout),
        }
    }

    /// Returns a new instance configured from the loaded configuration.
    ///
    pub fn from_config(config: &Config) -> Result<FormsApi, ConfigError> {
        let base_url = config.api_url.as_deref().ok_or(ConfigError::ApiUrlNotSet)?;
        Ok(FormsApi::new(base_url, config.timeout()))
    }

    /// Returns every form known to the server.
    ///
    pub async fn list_forms(&self) -> Result<Vec<FormResource>, ApiError> {
        debug!("Requesting all forms...");
        let value = self.client.request(Method::GET, "forms", None).await?;
        let forms: Vec<FormResource> = serde_json::from_value(value)?;
        debug!("Retrieved {} forms", forms.len());
        Ok(forms)
    }

    /// Returns a single form by id.
    ///
    pub async fn get_form(&self, id: &str) -> Result<FormResource, ApiError> {
        debug!("Requesting form {}...", id);
        let value = self
            .client
            .request(Method::GET, &format!("forms/{}", id), None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Creates a form with the given name and returns the server's copy.
    ///
    pub async fn create_form(&self, name: &str) -> Result<FormResource, ApiError> {
        debug!("Creating form named '{}'...", name);
        let value = self
            .client
            .request(Method::POST, "forms", Some(&json!({ "name": name })))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Creates a form from a caller-supplied body (generic creation path).
    ///
    pub async fn create_form_from(
        &self,
        data: &serde_json::Value,
    ) -> Result<FormResource, ApiError> {
        debug!("Creating form from submitted data...");
        let value = self.client.request(Method::POST, "forms", Some(data)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Persists a form's name, fields, and deleted field ids.
    ///
    pub async fn save_form(&self, id: &str, body: &SaveFormBody) -> Result<(), ApiError> {
        debug!(
            "Saving form {} ({} fields, {} deleted)...",
            id,
            body.form.fields.len(),
            body.deleted_fields.len()
        );
        let body = serde_json::to_value(body)?;
        self.client
            .request(Method::PUT, &format!("forms/{}", id), Some(&body))
            .await?;
        Ok(())
    }

    /// Deletes a form on the server.
    ///
    pub async fn delete_form(&self, id: &str) -> Result<(), ApiError> {
        debug!("Deleting form {}...", id);
        self.client
            .request(Method::DELETE, &format!("forms/{}", id), None)
            .await?;
        Ok(())
    }
}
