//! HTTP client for the Curio archive API.
//!
//! Generic JSON helpers plus domain methods for migration administration and
//! the published gateway list. The CLI uses this client directly.

pub mod api;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// API version prefix (e.g. "/api/v0"). Set CURIO_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("CURIO_API_VERSION").unwrap_or_else(|_| "v0".to_string());
    format!("/api/{}", version)
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Option<Auth>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// CURIO_API_URL (or API_URL), plus CURIO_API_KEY sent as X-API-Key when set.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("CURIO_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let auth = std::env::var("CURIO_API_KEY").ok().map(Auth::XApiKey);

        Self::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.apply_auth(self.client.get(self.build_url(path)));
        let response = request.send().await.context("Failed to send request")?;
        Self::read_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = request.send().await.context("Failed to send request")?;
        Self::read_json(response).await
    }
}

pub use curio_core::models::{
    GatewayListResponse, MigrationResult, MigrationStatus, RepairReport, ValidationReport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ApiClient::new("http://localhost:4000/".to_string(), None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(
            client.build_url("/api/v0/migration/status"),
            "http://localhost:4000/api/v0/migration/status"
        );
    }
}
