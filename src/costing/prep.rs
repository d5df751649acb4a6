use super::{calculate_cost, parse_batch_yield};
use crate::model::{BatchYield, CostBreakdown, IngredientLine};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An intermediate recipe component (sauce, dough, dressing) built from
/// ingredient lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prep {
    pub id: String,
    pub name: String,
    /// Free-text yield as entered in the form, e.g. "2kg"
    pub batch_yield: String,
    pub lines: Vec<IngredientLine>,
}

/// Current unit cost per ingredient id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    prices: HashMap<String, f64>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ingredient_id: impl Into<String>, unit_cost: f64) {
        self.prices.insert(ingredient_id.into(), unit_cost);
    }

    pub fn get(&self, ingredient_id: &str) -> Option<f64> {
        self.prices.get(ingredient_id).copied()
    }
}

impl FromIterator<(String, f64)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        PriceBook {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Fresh cost figures for one prep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepCost {
    pub prep_id: String,
    pub batch_yield: BatchYield,
    pub breakdown: CostBreakdown,
}

impl Prep {
    pub fn parsed_yield(&self) -> BatchYield {
        parse_batch_yield(&self.batch_yield)
    }

    pub fn cost(&self) -> CostBreakdown {
        calculate_cost(&self.lines, &self.parsed_yield())
    }

    pub fn uses_ingredient(&self, ingredient_id: &str) -> bool {
        self.lines.iter().any(|line| line.ingredient_id == ingredient_id)
    }

    /// Copy of this prep with every line's unit cost taken from `prices`.
    /// Lines whose ingredient is missing from the book keep their cost.
    pub fn repriced(&self, prices: &PriceBook) -> Prep {
        let lines = self
            .lines
            .iter()
            .map(|line| match prices.get(&line.ingredient_id) {
                Some(unit_cost) => IngredientLine {
                    unit_cost,
                    ..line.clone()
                },
                None => line.clone(),
            })
            .collect();

        Prep {
            lines,
            ..self.clone()
        }
    }
}

/// Recompute every prep that depends on `ingredient_id`, from scratch.
///
/// This is what a data-store hook calls after an ingredient price changes.
/// No previously stored cost is consulted.
pub fn recompute_for_ingredient(
    preps: &[Prep],
    ingredient_id: &str,
    prices: &PriceBook,
) -> Vec<PrepCost> {
    let costs: Vec<PrepCost> = preps
        .iter()
        .filter(|prep| prep.uses_ingredient(ingredient_id))
        .map(|prep| {
            let repriced = prep.repriced(prices);
            let batch_yield = repriced.parsed_yield();
            debug!("Recomputing cost for prep {} ({})", prep.id, prep.name);
            PrepCost {
                prep_id: prep.id.clone(),
                batch_yield,
                breakdown: calculate_cost(&repriced.lines, &batch_yield),
            }
        })
        .collect();

    info!(
        "Ingredient {} price change affected {} prep(s)",
        ingredient_id,
        costs.len()
    );
    costs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vinaigrette() -> Prep {
        Prep {
            id: "prep-1".to_string(),
            name: "Vinaigrette".to_string(),
            batch_yield: "500ml".to_string(),
            lines: vec![
                IngredientLine::new("olive-oil", 300.0, "ml", 0.02),
                IngredientLine::new("vinegar", 200.0, "ml", 0.01),
            ],
        }
    }

    fn dough() -> Prep {
        Prep {
            id: "prep-2".to_string(),
            name: "Pizza dough".to_string(),
            batch_yield: "2kg".to_string(),
            lines: vec![IngredientLine::new("flour", 1200.0, "g", 0.001)],
        }
    }

    #[test]
    fn test_prep_cost_uses_parsed_yield() {
        let breakdown = vinaigrette().cost();
        assert!((breakdown.total_cost - 8.0).abs() < 1e-9);
        assert!((breakdown.cost_per_unit - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_repriced_does_not_touch_original() {
        let prep = vinaigrette();
        let mut prices = PriceBook::new();
        prices.set("olive-oil", 0.03);

        let repriced = prep.repriced(&prices);
        assert_eq!(repriced.lines[0].unit_cost, 0.03);
        assert_eq!(repriced.lines[1].unit_cost, 0.01);
        assert_eq!(prep.lines[0].unit_cost, 0.02);
    }

    #[test]
    fn test_recompute_only_dependent_preps() {
        let preps = vec![vinaigrette(), dough()];
        let prices: PriceBook = [("olive-oil".to_string(), 0.04)].into_iter().collect();

        let costs = recompute_for_ingredient(&preps, "olive-oil", &prices);
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].prep_id, "prep-1");
        // 300 * 0.04 + 200 * 0.01
        assert!((costs[0].breakdown.total_cost - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_recompute_unknown_ingredient_is_empty() {
        let costs = recompute_for_ingredient(&[dough()], "saffron", &PriceBook::new());
        assert!(costs.is_empty());
    }
}
