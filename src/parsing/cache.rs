//! Bounded cache of remote dish parses.
//!
//! Passed explicitly into a [`DishParser`](super::DishParser); nothing is
//! cached at module level.

use crate::model::{DishParse, DishRequest, Language};
use moka::sync::Cache;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    language: Language,
    context: Option<String>,
    text: String,
}

impl CacheKey {
    /// Key on the normalized transcript so filler-only differences share an entry.
    pub fn new(request: &DishRequest, normalized_text: &str) -> Self {
        CacheKey {
            language: request.language,
            context: request.context.clone(),
            text: normalized_text.to_lowercase(),
        }
    }
}

/// Size-limited parse cache with idle expiry. Eviction is handled by moka
/// (TinyLFU admission, LRU eviction).
#[derive(Debug, Clone)]
pub struct ParseCache {
    inner: Cache<CacheKey, DishParse>,
}

impl ParseCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Entries not read for `idle` are dropped.
    pub fn with_idle_expiry(max_capacity: u64, idle: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<DishParse> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: CacheKey, parse: DishParse) {
        self.inner.insert(key, parse);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
