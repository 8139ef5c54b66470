// Cloudflare Workers AI client implementation

use crate::traits::{ByteStream, CompletionRequest, InferenceClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

const WORKERS_AI_API_BASE: &str = "https://api.cloudflare.com/client/v4";
const AI_GATEWAY_BASE: &str = "https://gateway.ai.cloudflare.com/v1";

/// Workers AI client (HTTP direct, no SDK)
///
/// Runs models through the account REST endpoint, or through an AI Gateway
/// when one is configured.
pub struct WorkersAiClient {
    http_client: reqwest::Client,
    account_id: String,
    gateway_id: Option<String>,
}

impl WorkersAiClient {
    /// Create new client with account id and API token
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_token))
                .context("Invalid API token format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            account_id: account_id.into(),
            gateway_id: None,
        })
    }

    /// Route requests through an AI Gateway instead of the account endpoint
    pub fn with_gateway(mut self, gateway_id: impl Into<String>) -> Self {
        self.gateway_id = Some(gateway_id.into());
        self
    }

    fn run_url(&self, model: &str) -> String {
        match &self.gateway_id {
            Some(gateway_id) => format!(
                "{}/{}/{}/workers-ai/{}",
                AI_GATEWAY_BASE, self.account_id, gateway_id, model
            ),
            None => format!(
                "{}/accounts/{}/ai/run/{}",
                WORKERS_AI_API_BASE, self.account_id, model
            ),
        }
    }

    /// Build run request payload
    fn build_payload(&self, request: &CompletionRequest) -> Result<Value> {
        let mut payload = serde_json::json!({
            "messages": &request.messages,
            "stream": request.options.stream,
        });

        if let Some(max_tokens) = request.options.max_tokens {
            payload
                .as_object_mut()
                .context("Run payload is not a JSON object")?
                .insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }

        Ok(payload)
    }
}

#[async_trait]
impl InferenceClient for WorkersAiClient {
    async fn run_stream(&self, request: CompletionRequest) -> Result<ByteStream> {
        let url = self.run_url(&request.model);
        let payload = self.build_payload(&request)?;

        tracing::debug!(model = %request.model, "Dispatching run request");

        let response = self
            .http_client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Workers AI error ({}): {}", status, error_text);
        }

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(anyhow::Error::from)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use crate::CompletionOptions;

    fn client() -> WorkersAiClient {
        WorkersAiClient::new("acct-123", "test-token").unwrap()
    }

    #[test]
    fn test_run_url_account_endpoint() {
        let url = client().run_url("@cf/meta/llama-3.1-8b-instruct-fp8");
        assert_eq!(
            url,
            "https://api.cloudflare.com/client/v4/accounts/acct-123/ai/run/@cf/meta/llama-3.1-8b-instruct-fp8"
        );
    }

    #[test]
    fn test_run_url_gateway_endpoint() {
        let url = client().with_gateway("my-gateway").run_url("@cf/meta/llama-3.1-8b-instruct-fp8");
        assert_eq!(
            url,
            "https://gateway.ai.cloudflare.com/v1/acct-123/my-gateway/workers-ai/@cf/meta/llama-3.1-8b-instruct-fp8"
        );
    }

    #[test]
    fn test_payload_shape() {
        let request = CompletionRequest::new(
            "@cf/meta/llama-3.1-8b-instruct-fp8",
            vec![Message::user("hi")],
        )
        .with_options(CompletionOptions::new().max_tokens(1024).stream(true));

        let payload = client().build_payload(&request).unwrap();
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["max_tokens"], 1024);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_payload_omits_absent_max_tokens() {
        let request = CompletionRequest::new("m", vec![Message::user("hi")]);
        let payload = client().build_payload(&request).unwrap();
        assert!(payload.get("max_tokens").is_none());
        assert_eq!(payload["stream"], false);
    }
}
