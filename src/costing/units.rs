//! Companion unit table consulted when an ingredient's unit cost is quoted
//! in a different unit than the quantity used in a prep.

/// Base dimension and factor relative to the dimension's base unit.
fn unit_factor(unit: &str) -> Option<(Dimension, f64)> {
    match unit.trim().to_lowercase().as_str() {
        "g" | "gram" | "grams" | "gramm" => Some((Dimension::Mass, 1.0)),
        "kg" | "kilogram" | "kilograms" | "kilogramm" => Some((Dimension::Mass, 1000.0)),
        "ml" | "milliliter" | "millilitre" | "milliliters" => Some((Dimension::Volume, 1.0)),
        "cl" => Some((Dimension::Volume, 10.0)),
        "dl" => Some((Dimension::Volume, 100.0)),
        "l" | "liter" | "litre" | "liters" => Some((Dimension::Volume, 1000.0)),
        "portion" | "portions" | "serving" | "servings" => Some((Dimension::Count, 1.0)),
        "pc" | "pcs" | "piece" | "pieces" | "stk" | "stück" => Some((Dimension::Count, 1.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Mass,
    Volume,
    Count,
}

/// Convert `quantity` from one unit to another.
///
/// Returns `None` when either unit is unknown or the units measure different
/// things (mass vs. volume needs a density, which this table does not carry).
pub fn convert(quantity: f64, from: &str, to: &str) -> Option<f64> {
    let (from_dim, from_factor) = unit_factor(from)?;
    let (to_dim, to_factor) = unit_factor(to)?;
    if from_dim != to_dim {
        return None;
    }
    Some(quantity * from_factor / to_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_conversions() {
        assert_eq!(convert(250.0, "g", "kg"), Some(0.25));
        assert_eq!(convert(2.0, "kg", "g"), Some(2000.0));
    }

    #[test]
    fn test_volume_conversions() {
        assert_eq!(convert(1.5, "l", "ml"), Some(1500.0));
        assert_eq!(convert(5.0, "cl", "ml"), Some(50.0));
    }

    #[test]
    fn test_same_unit_is_identity() {
        assert_eq!(convert(3.0, "ML", "ml"), Some(3.0));
        assert_eq!(convert(2.0, "portions", "serving"), Some(2.0));
    }

    #[test]
    fn test_incompatible_or_unknown_units() {
        assert_eq!(convert(1.0, "g", "ml"), None);
        assert_eq!(convert(1.0, "cup", "ml"), None);
    }
}
