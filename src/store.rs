//! Write sequencing for preps against an external data store.
//!
//! The store owns persistence and transactions; this module only orders the
//! writes and deletes the prep row again when its ingredient rows fail.

use crate::costing::{calculate_cost, parse_batch_yield};
use crate::error::KitchenError;
use crate::model::{BatchYield, CostBreakdown, IngredientLine};
use async_trait::async_trait;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

/// Prep as submitted by the creation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepDraft {
    pub name: String,
    pub batch_yield: String,
    pub lines: Vec<IngredientLine>,
}

/// Prep row with its computed cost fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepRecord {
    pub name: String,
    pub batch_yield: BatchYield,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub cost_per_batch: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedPrep {
    pub id: String,
    pub record: PrepRecord,
    pub breakdown: CostBreakdown,
}

/// External data store holding prep and prep-ingredient rows.
#[async_trait]
pub trait PrepStore: Send + Sync {
    /// Insert the prep row and return its id
    async fn insert_prep(&self, record: &PrepRecord) -> Result<String, KitchenError>;

    async fn insert_ingredient_lines(
        &self,
        prep_id: &str,
        lines: &[IngredientLine],
    ) -> Result<(), KitchenError>;

    async fn delete_prep(&self, prep_id: &str) -> Result<(), KitchenError>;
}

/// Validate, cost and persist a prep.
///
/// Order: prep row, then ingredient rows. If the ingredient rows fail the
/// prep row is deleted and the ingredient error is returned.
pub async fn save_prep<S: PrepStore + ?Sized>(
    store: &S,
    draft: &PrepDraft,
) -> Result<SavedPrep, KitchenError> {
    let batch_yield = parse_batch_yield(&draft.batch_yield);
    batch_yield.validate()?;

    let breakdown = calculate_cost(&draft.lines, &batch_yield);
    let record = PrepRecord {
        name: draft.name.clone(),
        batch_yield,
        total_cost: breakdown.total_cost,
        cost_per_unit: breakdown.cost_per_unit,
        cost_per_batch: breakdown.cost_per_batch,
    };

    let id = store.insert_prep(&record).await?;

    if let Err(e) = store.insert_ingredient_lines(&id, &draft.lines).await {
        warn!(
            "Ingredient rows for prep {} failed, deleting prep row: {}",
            id, e
        );
        if let Err(rollback) = store.delete_prep(&id).await {
            error!("Could not delete prep {} after failed write: {}", id, rollback);
            return Err(KitchenError::StoreError(format!(
                "{} (rollback of prep {} also failed: {})",
                e, id, rollback
            )));
        }
        return Err(e);
    }

    info!(
        "Saved prep {} ({}) with {} ingredient(s), cost {:.2}",
        id,
        record.name,
        draft.lines.len(),
        record.total_cost
    );

    Ok(SavedPrep {
        id,
        record,
        breakdown,
    })
}
