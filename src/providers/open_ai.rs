use super::{error_for_status, http_client, LlmProvider};
use crate::config::ProviderConfig;
use crate::error::KitchenError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, KitchenError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                KitchenError::ProviderError(
                    "OPENAI_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: http_client(timeout)?,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
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
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": content}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
                "response_format": {"type": "json_object"}
            }))
            .send()
            .await?;

        let response_body: Value = error_for_status("OpenAI", response).await?.json().await?;
        debug!("{:?}", response_body);

        let reply = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from OpenAI response")?
            .to_string();

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"name\": \"Lemon Tart\"}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );

        let result = provider.complete("system", "lemon tart").await.unwrap();
        assert_eq!(result, r#"{"name": "Lemon Tart"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );

        let err = provider.complete("system", "dish").await.unwrap_err();
        assert!(err.to_string().contains("400"));
        mock.assert_async().await;
    }

    #[test]
    fn test_new_uses_config_key_and_default_url() {
        let config = ProviderConfig {
            enabled: true,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 800,
            api_key: Some("test-key".to_string()),
            base_url: None,
        };
        let provider = OpenAIProvider::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.provider_name(), "openai");
    }
}
