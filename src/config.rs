use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level configuration for the dish parser and its providers
#[derive(Debug, Deserialize, Clone)]
pub struct KitchenConfig {
    /// Provider used when no chain is configured
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Ordered provider chain, each tried once
    #[serde(default)]
    pub chain: ChainConfig,
    /// Dish parser settings
    #[serde(default)]
    pub parser: ParserConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            chain: ChainConfig::default(),
            parser: ParserConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific text-generation provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4o-mini", "claude-3-5-haiku-latest")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChainConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParserConfig {
    /// Maximum cached remote parses; 0 disables the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Seconds an unread cache entry survives
    #[serde(default = "default_cache_idle_secs")]
    pub cache_idle_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            cache_idle_secs: default_cache_idle_secs(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    800
}

fn default_timeout() -> u64 {
    15
}

fn default_cache_capacity() -> u64 {
    256
}

fn default_cache_idle_secs() -> u64 {
    30 * 60
}

impl KitchenConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with CAFE_KITCHEN__ prefix
    /// 2. cafe-kitchen.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: CAFE_KITCHEN__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

pub fn load_config() -> Result<KitchenConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("cafe-kitchen").required(false))
        // Use double underscore for nested: CAFE_KITCHEN__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("CAFE_KITCHEN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_temperature(), 0.2);
        assert_eq!(default_max_tokens(), 800);
        assert_eq!(default_timeout(), 15);
    }

    #[test]
    fn test_kitchen_config_default_has_no_providers() {
        let config = KitchenConfig::default();
        assert!(config.providers.is_empty());
        assert!(!config.chain.enabled);
        assert_eq!(config.parser.cache_capacity, 256);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            default_provider = "anthropic"
            timeout = 5

            [providers.anthropic]
            enabled = true
            model = "claude-3-5-haiku-latest"
            api_key = "test-key"

            [chain]
            enabled = true
            order = ["anthropic", "ollama"]

            [parser]
            cache_capacity = 0
        "#;

        let config: KitchenConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.default_provider, "anthropic");
        assert_eq!(config.timeout, 5);
        let anthropic = &config.providers["anthropic"];
        assert!(anthropic.enabled);
        assert_eq!(anthropic.temperature, 0.2);
        assert_eq!(anthropic.max_tokens, 800);
        assert_eq!(config.chain.order, vec!["anthropic", "ollama"]);
        assert_eq!(config.parser.cache_capacity, 0);
        assert_eq!(config.parser.cache_idle_secs, 1800);
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        // Every field has a default, so an empty environment still loads
        let config = load_config().unwrap();
        assert!(config.timeout > 0);
    }
}
