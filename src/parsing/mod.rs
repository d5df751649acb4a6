//! Speech transcript to structured dish parsing.

pub mod cache;
pub mod heuristics;
pub mod normalize;
pub mod prompt;
mod response;

pub use cache::{CacheKey, ParseCache};
pub use normalize::{normalize_transcript, Normalized};
pub use prompt::{build_dish_prompt, DISH_PARSER_PROMPT};
pub use response::parse_remote_dish;

use crate::builder::DishParserBuilder;
use crate::model::{DishParse, DishRequest, FallbackReason, ParseSource};
use crate::providers::LlmProvider;
use log::{debug, info, warn};

/// Confidence of a heuristic parse when the provider was unreachable
pub const FALLBACK_CONFIDENCE: f64 = 0.2;
/// Confidence of a heuristic parse when the provider answered with junk
pub const MALFORMED_RESPONSE_CONFIDENCE: f64 = 0.3;

/// Turns transcripts into draft dishes, asking a text-generation provider
/// first and falling back to local heuristics.
pub struct DishParser {
    provider: Option<Box<dyn LlmProvider>>,
    cache: Option<ParseCache>,
}

impl DishParser {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        DishParser {
            provider: Some(provider),
            cache: None,
        }
    }

    /// Parser that never leaves the process.
    pub fn offline() -> Self {
        DishParser {
            provider: None,
            cache: None,
        }
    }

    pub fn builder() -> DishParserBuilder {
        DishParserBuilder::default()
    }

    pub fn with_cache(mut self, cache: ParseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&ParseCache> {
        self.cache.as_ref()
    }

    /// Parse a transcript. Never fails: provider errors and malformed
    /// replies resolve to the heuristic result with a low confidence score.
    pub async fn parse(&self, request: &DishRequest) -> DishParse {
        let normalized = normalize_transcript(&request.text, request.language);

        let Some(provider) = self.provider.as_deref() else {
            return fallback(&normalized, request, FallbackReason::NoProvider);
        };

        if normalized.text.trim().is_empty() {
            debug!("Empty transcript, skipping provider call");
            return fallback(&normalized, request, FallbackReason::EmptyTranscript);
        }

        let key = CacheKey::new(request, &normalized.text);
        if let Some(mut cached) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!("Parse cache hit for {:?}", normalized.text);
            cached.dish.raw_text = request.text.clone();
            return cached;
        }

        let system_prompt = build_dish_prompt(request.language, request.context.as_deref());
        let reply = match provider.complete(&system_prompt, &normalized.text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    "Provider {} failed, using local heuristics: {}",
                    provider.provider_name(),
                    e
                );
                return fallback(&normalized, request, FallbackReason::RemoteFailed);
            }
        };

        match parse_remote_dish(&reply, &normalized, &request.text) {
            Ok(dish) => {
                info!(
                    "Parsed dish {:?} via {} (confidence {:.2})",
                    dish.name,
                    provider.provider_name(),
                    dish.confidence_score
                );
                let parse = DishParse {
                    dish,
                    source: ParseSource::Remote {
                        provider: provider.provider_name().to_string(),
                    },
                };
                if let Some(cache) = &self.cache {
                    cache.insert(key, parse.clone());
                }
                parse
            }
            Err(e) => {
                warn!(
                    "Unusable reply from {}, using local heuristics: {}",
                    provider.provider_name(),
                    e
                );
                fallback(&normalized, request, FallbackReason::MalformedResponse)
            }
        }
    }
}

fn fallback(normalized: &Normalized, request: &DishRequest, reason: FallbackReason) -> DishParse {
    let confidence = match reason {
        FallbackReason::MalformedResponse => MALFORMED_RESPONSE_CONFIDENCE,
        FallbackReason::NoProvider
        | FallbackReason::EmptyTranscript
        | FallbackReason::RemoteFailed => FALLBACK_CONFIDENCE,
    };
    DishParse {
        dish: heuristics::fallback_dish(normalized, &request.text, confidence),
        source: ParseSource::Fallback { reason },
    }
}
