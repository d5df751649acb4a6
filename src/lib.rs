//! Prep costing and dish transcript parsing for cafe kitchen administration.
//!
//! Two independent concerns live here:
//!
//! - **Costing**: parse a free-text batch yield ("500ml", "2kg") and roll up
//!   ingredient costs into a per-batch and per-unit breakdown. Pure functions,
//!   recomputed from current prices on every call.
//! - **Dish parsing**: turn a spoken dish description into a draft menu entry,
//!   asking a text-generation provider first and falling back to local
//!   keyword heuristics. Parsing never fails; the result carries a confidence
//!   score and says which path produced it.
//!
//! # Example
//! ```
//! use cafe_kitchen::{calculate_cost, parse_batch_yield, IngredientLine};
//!
//! let batch_yield = parse_batch_yield("100g");
//! let lines = vec![
//!     IngredientLine::new("flour", 50.0, "g", 0.03),
//!     IngredientLine::new("sugar", 100.0, "g", 0.01),
//! ];
//! let breakdown = calculate_cost(&lines, &batch_yield);
//! assert!((breakdown.total_cost - 2.5).abs() < 1e-9);
//! ```

pub mod builder;
pub mod config;
pub mod costing;
pub mod error;
pub mod model;
pub mod parsing;
pub mod providers;
pub mod store;

pub use builder::{DishParserBuilder, ProviderKind};
pub use config::KitchenConfig;
pub use costing::{
    calculate_cost, parse_batch_yield, recompute_for_ingredient, Prep, PrepCost, PriceBook,
};
pub use error::KitchenError;
pub use model::{
    BatchYield, CostBreakdown, DishParse, DishRequest, FallbackReason, IngredientCost,
    IngredientLine, Language, ParseSource, ParsedDish, PriceEstimate, YieldUnit,
};
pub use parsing::{DishParser, ParseCache};
pub use store::{save_prep, PrepDraft, PrepRecord, PrepStore, SavedPrep};

use log::warn;

/// Parse a transcript with the provider set up in `cafe-kitchen.toml` and
/// the environment.
///
/// A missing or broken configuration is not an error: the transcript is
/// parsed with the local heuristics instead.
///
/// Builds a fresh parser per call, so nothing is cached between calls. Keep
/// a [`DishParser`] around to reuse its cache.
pub async fn parse_dish(request: &DishRequest) -> DishParse {
    let parser = match DishParser::builder().cache_capacity(0).build() {
        Ok(parser) => parser,
        Err(e) => {
            warn!("No dish parsing provider available, using local heuristics: {}", e);
            DishParser::offline()
        }
    };
    parser.parse(request).await
}
