// HTTP retrieval client implementation

use crate::traits::RetrievalClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

/// Retrieval client speaking the `{ query, k }` request shape over HTTP.
pub struct HttpRetrievalClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpRetrievalClient {
    /// Create new client against a query endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), None)
    }

    /// Create new client with a bearer token
    pub fn with_api_key(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), Some(api_key.into()))
    }

    fn build(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .context("Invalid API key format")?,
            );
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

#[async_trait]
impl RetrievalClient for HttpRetrievalClient {
    async fn query(&self, query: &str, k: usize) -> Result<Value> {
        tracing::debug!(k, "Querying vector index");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query, "k": k }))
            .send()
            .await
            .context("Failed to send retrieval request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Retrieval service error ({}): {}", status, error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse retrieval response")
    }
}
