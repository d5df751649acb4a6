use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Units a prep batch yield may be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldUnit {
    Ml,
    G,
    Kg,
    L,
    Portion,
    Serving,
}

impl YieldUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            YieldUnit::Ml => "ml",
            YieldUnit::G => "g",
            YieldUnit::Kg => "kg",
            YieldUnit::L => "l",
            YieldUnit::Portion => "portion",
            YieldUnit::Serving => "serving",
        }
    }
}

impl fmt::Display for YieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YieldUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(YieldUnit::Ml),
            "g" => Ok(YieldUnit::G),
            "kg" => Ok(YieldUnit::Kg),
            "l" => Ok(YieldUnit::L),
            "portion" | "portions" => Ok(YieldUnit::Portion),
            "serving" | "servings" => Ok(YieldUnit::Serving),
            other => Err(format!("Unknown yield unit: {}", other)),
        }
    }
}

/// Total quantity a prep recipe produces.
///
/// `is_valid` is false whenever the source text did not match the yield
/// grammar or carried a non-positive amount. Callers must surface that as a
/// validation error instead of silently using the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchYield {
    pub quantity: f64,
    pub unit: YieldUnit,
    pub is_valid: bool,
}

impl BatchYield {
    pub fn new(quantity: f64, unit: YieldUnit) -> Self {
        BatchYield {
            quantity,
            unit,
            is_valid: quantity.is_finite() && quantity > 0.0,
        }
    }

    /// Default reported for unparseable yields: one portion, marked invalid.
    pub fn invalid() -> Self {
        BatchYield {
            quantity: 1.0,
            unit: YieldUnit::Portion,
            is_valid: false,
        }
    }
}

impl Default for BatchYield {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for BatchYield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantity, self.unit)
    }
}

/// One ingredient reference inside a prep.
///
/// The ingredient itself lives in the external data store; the unit cost is
/// read once and treated as fixed for the duration of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    /// Unit `unit_cost` is expressed in, when it differs from `unit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_unit: Option<String>,
}

impl IngredientLine {
    pub fn new(
        ingredient_id: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_cost: f64,
    ) -> Self {
        IngredientLine {
            ingredient_id: ingredient_id.into(),
            quantity,
            unit: unit.into(),
            unit_cost,
            cost_unit: None,
        }
    }

    pub fn with_cost_unit(mut self, cost_unit: impl Into<String>) -> Self {
        self.cost_unit = Some(cost_unit.into());
        self
    }
}

/// Cost contribution of a single ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    pub id: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub percentage: f64,
}

/// Derived cost rollup for a prep. Never stored; recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub cost_per_batch: f64,
    pub per_ingredient: Vec<IngredientCost>,
}

/// Transcript language. Selects the normalization rules and prompt wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "de" | "german" | "deutsch" => Ok(Language::German),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Input to the dish parser: a raw transcript plus where it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishRequest {
    pub text: String,
    #[serde(default)]
    pub language: Language,
    /// Free-form hint such as "menu item" or "daily special"
    #[serde(default)]
    pub context: Option<String>,
}

impl DishRequest {
    pub fn new(text: impl Into<String>) -> Self {
        DishRequest {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub regular: f64,
    pub student: f64,
}

impl PriceEstimate {
    /// Student price is always 80% of the regular price, to the cent.
    pub fn from_regular(regular: f64) -> Self {
        PriceEstimate {
            regular: round_cents(regular),
            student: round_cents(regular * 0.8),
        }
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Structured dish suggestion extracted from a transcript.
///
/// Always handed to a form for human review; never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDish {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub cuisine_type: String,
    pub dietary_tags: Vec<String>,
    pub estimated_price: PriceEstimate,
    pub confidence_score: f64,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No provider configured
    NoProvider,
    /// Nothing left to parse after normalization; the provider is not called
    EmptyTranscript,
    /// Provider call errored or timed out
    RemoteFailed,
    /// Provider answered with content that was not usable JSON
    MalformedResponse,
}

/// Where a parsed dish came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseSource {
    Remote { provider: String },
    Fallback { reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishParse {
    pub dish: ParsedDish,
    pub source: ParseSource,
}

impl DishParse {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ParseSource::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yield_unit_from_str_folds_plurals() {
        assert_eq!("Portions".parse::<YieldUnit>().unwrap(), YieldUnit::Portion);
        assert_eq!("servings".parse::<YieldUnit>().unwrap(), YieldUnit::Serving);
        assert_eq!("KG".parse::<YieldUnit>().unwrap(), YieldUnit::Kg);
        assert!("cups".parse::<YieldUnit>().is_err());
    }

    #[test]
    fn test_batch_yield_new_rejects_non_positive() {
        assert!(BatchYield::new(2.0, YieldUnit::Kg).is_valid);
        assert!(!BatchYield::new(0.0, YieldUnit::Kg).is_valid);
        assert!(!BatchYield::new(-1.0, YieldUnit::G).is_valid);
        assert!(!BatchYield::new(f64::NAN, YieldUnit::G).is_valid);
    }

    #[test]
    fn test_price_estimate_student_rounding() {
        let price = PriceEstimate::from_regular(9.99);
        assert_eq!(price.regular, 9.99);
        assert_eq!(price.student, 7.99);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::German);
        assert_eq!("Deutsch".parse::<Language>().unwrap(), Language::German);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_parse_source_serializes_with_kind_tag() {
        let source = ParseSource::Fallback {
            reason: FallbackReason::MalformedResponse,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["reason"], "malformed_response");
    }
}
