use super::heuristics;
use super::normalize::Normalized;
use crate::error::KitchenError;
use crate::model::{round_cents, ParsedDish, PriceEstimate};
use log::debug;
use serde_json::Value;

/// Confidence assumed when the provider does not report one.
const DEFAULT_REMOTE_CONFIDENCE: f64 = 0.5;
/// Ceiling applied when the transcript contained competing prices.
const AMBIGUOUS_CONFIDENCE_CAP: f64 = 0.5;

/// Turn provider output into a dish, filling gaps from the local heuristics.
///
/// Fails only when no JSON object can be recovered from `content`.
pub fn parse_remote_dish(
    content: &str,
    normalized: &Normalized,
    raw_text: &str,
) -> Result<ParsedDish, KitchenError> {
    let json: Value = serde_json::from_str(extract_json_object(content))?;
    if !json.is_object() {
        return Err(KitchenError::ProviderError(
            "Response JSON is not an object".to_string(),
        ));
    }
    debug!("Remote dish JSON: {}", json);

    let text = normalized.text.as_str();

    let name = non_empty_str(&json["name"])
        .map(String::from)
        .unwrap_or_else(|| heuristics::extract_dish_name(text));

    let description = non_empty_str(&json["description"])
        .map(String::from)
        .unwrap_or_else(|| heuristics::describe(text));

    let ingredients = string_list(&json["ingredients"])
        .unwrap_or_else(|| heuristics::extract_basic_ingredients(text));

    let cuisine_type = non_empty_str(&json["cuisine_type"])
        .or_else(|| non_empty_str(&json["cuisine"]))
        .map(str::to_lowercase)
        .unwrap_or_else(|| heuristics::detect_cuisine_type(text));

    let dietary_tags = string_list(&json["dietary_tags"])
        .unwrap_or_else(|| heuristics::extract_dietary_tags(text));

    // A spoken price is only trusted when it is the one unambiguous amount
    let spoken_price = if normalized.ambiguous {
        None
    } else {
        heuristics::spoken_price(text)
    };
    let estimated_price = remote_price(&json["estimated_price"])
        .or_else(|| spoken_price.map(PriceEstimate::from_regular))
        .unwrap_or_else(|| heuristics::estimate_price(text));

    let mut confidence_score = json["confidence_score"]
        .as_f64()
        .or_else(|| json["confidence"].as_f64())
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_REMOTE_CONFIDENCE);
    if normalized.ambiguous {
        confidence_score = confidence_score.min(AMBIGUOUS_CONFIDENCE_CAP);
    }

    Ok(ParsedDish {
        name,
        description,
        ingredients,
        cuisine_type,
        dietary_tags,
        estimated_price,
        confidence_score,
        raw_text: raw_text.to_string(),
    })
}

/// Slice out the JSON object from content that may be wrapped in markdown
/// fences or surrounded by prose.
fn extract_json_object(content: &str) -> &str {
    let trimmed = content.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Non-empty list of trimmed strings; `None` when absent or empty.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(non_empty_str)
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().replace(',', ".").parse().ok())
        .filter(|n: &f64| n.is_finite() && *n > 0.0)
}

fn remote_price(value: &Value) -> Option<PriceEstimate> {
    if let Some(regular) = number(value) {
        return Some(PriceEstimate::from_regular(regular));
    }
    let regular = number(&value["regular"])?;
    Some(match number(&value["student"]) {
        Some(student) => PriceEstimate {
            regular: round_cents(regular),
            student: round_cents(student),
        },
        None => PriceEstimate::from_regular(regular),
    })
}
