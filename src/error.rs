use thiserror::Error;

/// Errors surfaced by the configuration, provider and persistence seams.
///
/// The pure costing and parsing entry points never return these; they report
/// problems through `is_valid` flags and confidence scores instead.
#[derive(Error, Debug)]
pub enum KitchenError {
    /// HTTP request to a text-generation provider failed
    #[error("Failed to reach provider: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Provider answered but the answer could not be used
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Provider content was not valid JSON
    #[error("Invalid response JSON: {0}")]
    ResponseError(#[from] serde_json::Error),

    /// Batch yield failed validation at a form boundary
    #[error("Invalid batch yield: {0:?}")]
    InvalidBatchYield(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// External prep store rejected a write
    #[error("Store error: {0}")]
    StoreError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
