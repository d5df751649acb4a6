use crate::error::KitchenError;
use crate::model::{BatchYield, YieldUnit};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static YIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)?\s*(ml|kg|g|l|portions?|servings?)$")
        .expect("yield pattern is valid")
});

/// Parse a free-text batch yield such as `"500ml"`, `"2 kg"` or `"12 portions"`.
///
/// A missing amount counts as one unit (`"portion"` is one portion).
/// Anything outside the grammar, and any amount that is not strictly
/// positive, yields [`BatchYield::invalid`].
pub fn parse_batch_yield(input: &str) -> BatchYield {
    let trimmed = input.trim();
    let Some(captures) = YIELD_PATTERN.captures(trimmed) else {
        debug!("Batch yield {:?} does not match the yield grammar", input);
        return BatchYield::invalid();
    };

    let quantity = match captures.get(1) {
        Some(amount) => match amount.as_str().replace(',', ".").parse::<f64>() {
            Ok(quantity) => quantity,
            Err(_) => return BatchYield::invalid(),
        },
        None => 1.0,
    };

    let unit = match captures[2].parse::<YieldUnit>() {
        Ok(unit) => unit,
        Err(_) => return BatchYield::invalid(),
    };

    let parsed = BatchYield::new(quantity, unit);
    if parsed.is_valid {
        parsed
    } else {
        debug!("Batch yield {:?} has a non-positive amount", input);
        BatchYield::invalid()
    }
}

impl BatchYield {
    /// Turn an invalid yield into an error for a form boundary.
    pub fn validate(&self) -> Result<&Self, KitchenError> {
        if self.is_valid {
            Ok(self)
        } else {
            Err(KitchenError::InvalidBatchYield(format!(
                "expected an amount greater than zero followed by ml, g, kg, l, portion or serving (got {})",
                self
            )))
        }
    }
}
