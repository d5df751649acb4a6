use crate::config::KitchenConfig;
use crate::error::KitchenError;
use crate::providers::{LlmProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::error::Error;
use std::time::Duration;

/// Ordered list of providers. Each is asked once; the first answer wins.
pub struct ProviderChain {
    providers: Vec<Box<dyn LlmProvider>>,
}

impl ProviderChain {
    /// Build the chain from configuration. With the chain disabled this is
    /// just the default provider.
    pub fn new(config: &KitchenConfig) -> Result<Self, KitchenError> {
        Self::with_timeout(config, Duration::from_secs(config.timeout))
    }

    /// Like [`new`](Self::new), but every provider uses `timeout` instead of
    /// `config.timeout`
    pub fn with_timeout(config: &KitchenConfig, timeout: Duration) -> Result<Self, KitchenError> {
        if !config.chain.enabled {
            let default_provider =
                ProviderFactory::get_default_provider_with_timeout(config, timeout)?;
            return Ok(ProviderChain {
                providers: vec![default_provider],
            });
        }

        let mut providers = Vec::new();

        for provider_name in &config.chain.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config, timeout) {
                        Ok(provider) => {
                            info!("Added '{}' to provider chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in chain order not found in configuration",
                    provider_name
                );
            }
        }

        Self::from_providers(providers)
    }

    pub fn from_providers(providers: Vec<Box<dyn LlmProvider>>) -> Result<Self, KitchenError> {
        if providers.is_empty() {
            return Err(KitchenError::ProviderError(
                "No providers available in chain configuration".to_string(),
            ));
        }
        Ok(ProviderChain { providers })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl LlmProvider for ProviderChain {
    fn provider_name(&self) -> &str {
        // A single-provider chain reports the provider it wraps
        match self.providers.as_slice() {
            [only] => only.provider_name(),
            _ => "chain",
        }
    }

    async fn complete(
        &self,
        system_prompt: &str,
        content: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut all_errors: Vec<String> = Vec::new();

        for provider in &self.providers {
            debug!("Asking {}", provider.provider_name());
            match provider.complete(system_prompt, content).await {
                Ok(reply) => {
                    info!("Dish parsed by {}", provider.provider_name());
                    return Ok(reply);
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.provider_name(), e);
                    all_errors.push(format!("{}: {}", provider.provider_name(), e));
                }
            }
        }

        Err(format!("All providers failed:\n{}", all_errors.join("\n")).into())
    }
}
