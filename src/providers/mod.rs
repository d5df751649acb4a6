mod anthropic;
mod chain;
mod factory;
mod google;
mod ollama;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use chain::ProviderChain;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

/// Unified trait for all text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send one system prompt plus user content and return the raw reply text.
    ///
    /// Called once per parse; callers do not retry.
    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// HTTP client shared by the providers; the timeout bounds each request.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Fail with the status and body when the provider answered with an error.
pub(crate) async fn error_for_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, Box<dyn Error + Send + Sync>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("{} API error ({}): {}", provider, status, body).into())
}
