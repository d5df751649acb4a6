//! Prep costing: batch yield parsing, cost rollups and recompute-on-demand.

mod calculator;
pub mod prep;
pub mod units;
mod yield_parser;

pub use calculator::calculate_cost;
pub use prep::{recompute_for_ingredient, Prep, PrepCost, PriceBook};
pub use yield_parser::parse_batch_yield;
