use crate::config::{KitchenConfig, ProviderConfig};
use crate::error::KitchenError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, KitchenError> {
        if !config.enabled {
            return Err(KitchenError::ProviderError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config, timeout)?)),
            "google" => Ok(Box::new(GoogleProvider::new(config, timeout)?)),
            "ollama" => Ok(Box::new(OllamaProvider::new(config, timeout)?)),
            _ => Err(KitchenError::ProviderError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(
        config: &KitchenConfig,
    ) -> Result<Box<dyn LlmProvider>, KitchenError> {
        Self::get_default_provider_with_timeout(config, Duration::from_secs(config.timeout))
    }

    /// Same as [`get_default_provider`](Self::get_default_provider), with a
    /// request timeout that overrides the whole seconds in `config.timeout`
    pub fn get_default_provider_with_timeout(
        config: &KitchenConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, KitchenError> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            KitchenError::ProviderError(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config, timeout)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic", "google", "ollama"]
    }
}
