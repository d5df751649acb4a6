use super::{error_for_status, http_client, LlmProvider};
use crate::config::ProviderConfig;
use crate::error::KitchenError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Local Ollama server via its OpenAI-compatible endpoint. No API key.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, KitchenError> {
        Ok(OllamaProvider {
            client: http_client(timeout)?,
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
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 800,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
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

        let response_body: Value = error_for_status("Ollama", response).await?.json().await?;
        debug!("Ollama response: {:?}", response_body);

        if let Some(error) = response_body.get("error") {
            let error_message = error
                .as_str()
                .unwrap_or_else(|| error["message"].as_str().unwrap_or("Unknown error"));
            return Err(format!("Ollama API error: {}", error_message).into());
        }

        let reply = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from Ollama response")?
            .to_string();

        Ok(reply)
    }
}
