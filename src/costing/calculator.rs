use super::units;
use crate::model::{BatchYield, CostBreakdown, IngredientCost, IngredientLine};
use log::warn;

/// Roll up ingredient costs for one batch.
///
/// Pure: inputs are only read, and identical inputs give identical output.
/// An empty ingredient list gives an all-zero breakdown. When the batch
/// yield is invalid or has no positive quantity, `cost_per_unit` is the
/// whole batch cost (a one-unit batch).
pub fn calculate_cost(lines: &[IngredientLine], batch_yield: &BatchYield) -> CostBreakdown {
    let line_costs: Vec<f64> = lines
        .iter()
        .map(|line| {
            let cost = line.unit_cost * costed_quantity(line);
            if cost.is_finite() {
                cost
            } else {
                warn!(
                    "Ingredient {} has a non-finite cost (quantity {}, unit cost {}); counting it as zero",
                    line.ingredient_id, line.quantity, line.unit_cost
                );
                0.0
            }
        })
        .collect();

    let total_cost: f64 = line_costs.iter().sum();

    let cost_per_unit = if batch_yield.is_valid && batch_yield.quantity > 0.0 {
        total_cost / batch_yield.quantity
    } else {
        total_cost
    };

    let per_ingredient = lines
        .iter()
        .zip(&line_costs)
        .map(|(line, &cost)| IngredientCost {
            id: line.ingredient_id.clone(),
            quantity: line.quantity,
            unit: line.unit.clone(),
            unit_cost: line.unit_cost,
            total_cost: cost,
            percentage: if total_cost > 0.0 {
                cost / total_cost * 100.0
            } else {
                0.0
            },
        })
        .collect();

    CostBreakdown {
        total_cost,
        cost_per_unit,
        cost_per_batch: total_cost,
        per_ingredient,
    }
}

/// Quantity expressed in the unit the line's unit cost is quoted in.
fn costed_quantity(line: &IngredientLine) -> f64 {
    let Some(cost_unit) = line.cost_unit.as_deref() else {
        return line.quantity;
    };
    if cost_unit.eq_ignore_ascii_case(&line.unit) {
        return line.quantity;
    }
    match units::convert(line.quantity, &line.unit, cost_unit) {
        Some(converted) => converted,
        None => {
            warn!(
                "No conversion from {} to {} for ingredient {}; using the raw quantity",
                line.unit, cost_unit, line.ingredient_id
            );
            line.quantity
        }
    }
}
