use std::time::Duration;

use log::warn;

use crate::config::{KitchenConfig, ProviderConfig};
use crate::parsing::{DishParser, ParseCache};
use crate::providers::{LlmProvider, ProviderChain, ProviderFactory};
use crate::KitchenError;

/// Text-generation provider selectable on the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Google,
    Ollama,
}

impl ProviderKind {
    /// Provider name string used by the factory
    fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Ollama => "ollama",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            ProviderKind::Google => "gemini-1.5-flash",
            ProviderKind::Ollama => "llama3",
        }
    }
}

/// Builder for configuring a [`DishParser`]
#[derive(Debug, Default)]
pub struct DishParserBuilder {
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    cache_capacity: Option<u64>,
    config: Option<KitchenConfig>,
    offline: bool,
}

impl DishParserBuilder {
    /// Use a specific provider instead of the configured default
    ///
    /// # Example
    /// ```
    /// use cafe_kitchen::{DishParser, ProviderKind};
    ///
    /// let builder = DishParser::builder()
    ///     .provider(ProviderKind::Anthropic)
    ///     .api_key("your-api-key");
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the provider instead of relying on environment
    /// variables or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point the provider at a proxy or self-hosted endpoint
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request timeout; a slow provider falls back to local heuristics
    ///
    /// # Example
    /// ```
    /// use cafe_kitchen::DishParser;
    /// use std::time::Duration;
    ///
    /// let builder = DishParser::builder().timeout(Duration::from_secs(5));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Cache up to `capacity` remote parses; 0 disables caching
    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Use an already loaded configuration instead of reading it from disk
    pub fn config(mut self, config: KitchenConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Never call a provider; every parse uses the local heuristics
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Build the parser
    ///
    /// # Errors
    /// Returns `KitchenError` if:
    /// - the configuration cannot be loaded
    /// - the selected provider has no API key
    /// - no configured provider can be created
    pub fn build(self) -> Result<DishParser, KitchenError> {
        if self.offline {
            return Ok(DishParser::offline());
        }

        let config = match self.config {
            Some(config) => config,
            None if self.provider.is_some() => KitchenConfig::default(),
            None => KitchenConfig::load()?,
        };
        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout));

        let provider: Box<dyn LlmProvider> = match self.provider {
            Some(kind) => {
                let configured = config.providers.get(kind.as_str());
                let provider_config = ProviderConfig {
                    enabled: true,
                    model: self
                        .model
                        .or_else(|| configured.map(|c| c.model.clone()))
                        .unwrap_or_else(|| kind.default_model().to_string()),
                    temperature: configured.map_or(0.2, |c| c.temperature),
                    max_tokens: configured.map_or(800, |c| c.max_tokens),
                    api_key: self
                        .api_key
                        .or_else(|| configured.and_then(|c| c.api_key.clone())),
                    base_url: self
                        .base_url
                        .or_else(|| configured.and_then(|c| c.base_url.clone())),
                };
                ProviderFactory::create(kind.as_str(), &provider_config, timeout)?
            }
            None => {
                if self.api_key.is_some() || self.model.is_some() {
                    warn!("api_key/model on the builder are ignored without .provider()");
                }
                Box::new(ProviderChain::with_timeout(&config, timeout).map_err(|e| {
                    KitchenError::BuilderError(format!("No usable provider: {}", e))
                })?)
            }
        };

        let capacity = self
            .cache_capacity
            .unwrap_or(config.parser.cache_capacity);
        let parser = DishParser::new(provider);
        if capacity == 0 {
            return Ok(parser);
        }
        Ok(parser.with_cache(ParseCache::with_idle_expiry(
            capacity,
            Duration::from_secs(config.parser.cache_idle_secs),
        )))
    }
}
