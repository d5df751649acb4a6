use super::{error_for_status, http_client, LlmProvider};
use crate::config::ProviderConfig;
use crate::error::KitchenError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, KitchenError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                KitchenError::ProviderError(
                    "GOOGLE_API_KEY not found in config or environment".to_string(),
                )
            })?;

        Ok(GoogleProvider {
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
        GoogleProvider {
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
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "systemInstruction": {
                    "parts": [{"text": system_prompt}]
                },
                "contents": [{
                    "role": "user",
                    "parts": [{"text": content}]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens,
                    "responseMimeType": "application/json"
                }
            }))
            .send()
            .await?;

        let response_body: Value = error_for_status("Google", response).await?.json().await?;
        debug!("{:?}", response_body);

        let reply = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Google Gemini response")?
            .to_string();

        Ok(reply)
    }
}
