use super::{error_for_status, http_client, LlmProvider};
use crate::config::ProviderConfig;
use crate::error::KitchenError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, KitchenError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                KitchenError::ProviderError(
                    "ANTHROPIC_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(AnthropicProvider {
            client: http_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 800,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "system": system_prompt,
                "messages": [
                    {
                        "role": "user",
                        "content": content
                    }
                ]
            }))
            .send()
            .await?;

        let response_body: Value = error_for_status("Anthropic", response).await?.json().await?;
        debug!("{:?}", response_body);

        let reply = response_body["content"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Anthropic response")?
            .to_string();

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", API_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": [{"type": "text", "text": "{\"name\": \"Borscht\"}"}]}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "claude-3-5-haiku-latest".to_string(),
        );

        let reply = provider.complete("system", "borscht").await.unwrap();
        assert_eq!(reply, r#"{"name": "Borscht"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "claude-3-5-haiku-latest".to_string(),
        );

        assert!(provider.complete("system", "soup").await.is_err());
    }

    #[test]
    fn test_provider_name() {
        let config = ProviderConfig {
            enabled: true,
            model: "claude-3-5-haiku-latest".to_string(),
            temperature: 0.2,
            max_tokens: 800,
            api_key: Some("test-key".to_string()),
            base_url: None,
        };

        let provider = AnthropicProvider::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }
}
