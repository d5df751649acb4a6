//! Deterministic dish extraction used when the text-generation provider is
//! unavailable or answers with something unusable.

use super::normalize::Normalized;
use crate::model::{round_cents, ParsedDish, PriceEstimate};
use regex::Regex;
use std::sync::LazyLock;

pub const UNTITLED_DISH: &str = "Untitled dish";
pub const DEFAULT_CUISINE: &str = "fusion";

const BASE_PRICE: f64 = 8.0;
const EXPENSIVE_SURCHARGE: f64 = 4.0;
const CHEAP_DISCOUNT: f64 = 2.0;
const LONG_DESCRIPTION_SURCHARGE: f64 = 2.0;
const LONG_DESCRIPTION_WORDS: usize = 20;
const MIN_PRICE: f64 = 5.0;
const MAX_PRICE: f64 = 25.0;

const SHORT_KEYWORD_CHARS: usize = 4;

const MAX_NAME_CHARS: usize = 50;
const NAME_WORDS: usize = 4;
const MAX_DESCRIPTION_CHARS: usize = 200;

/// English and German ingredient names recognized in transcripts.
const INGREDIENT_VOCABULARY: &[&str] = &[
    // multi-word phrases
    "red onion", "spring onion", "sweet potato", "soy sauce", "coconut milk", "olive oil",
    "bell pepper", "cherry tomato", "goat cheese", "sour cream", "green beans", "rote zwiebel",
    "grüne bohnen",
    // english
    "onion", "garlic", "tomato", "potato", "salmon", "tuna", "beef", "steak", "chicken", "pork",
    "lamb", "duck", "shrimp", "prawn", "tofu", "tempeh", "rice", "noodles", "pasta", "spaghetti",
    "cheese", "mozzarella", "parmesan", "feta", "halloumi", "basil", "lemon", "lime", "ginger",
    "chili", "mushroom", "spinach", "egg", "cream", "butter", "carrot", "avocado", "lentils",
    "chickpeas", "beans", "cucumber", "zucchini", "eggplant", "pumpkin", "truffle", "bread",
    "quinoa", "couscous", "hummus", "pesto", "coriander", "cilantro", "mint", "yogurt", "honey",
    "apple", "lettuce",
    // german
    "zwiebel", "frühlingszwiebel", "knoblauch", "tomate", "kartoffel", "süßkartoffel", "lachs",
    "thunfisch", "rindfleisch", "rind", "hähnchen", "huhn", "schweinefleisch", "lamm", "ente",
    "garnelen", "reis", "nudeln", "käse", "ziegenkäse", "basilikum", "zitrone", "limette",
    "ingwer", "pilze", "champignons", "spinat", "eier", "sahne", "karotte", "möhre", "linsen",
    "kichererbsen", "bohnen", "gurke", "aubergine", "kürbis", "trüffel", "brot", "koriander",
    "minze", "joghurt", "honig", "apfel", "sojasauce", "kokosmilch", "olivenöl", "paprika",
    "feldsalat",
];

// Longest phrases first so "red onion" claims its span before "onion" can.
static SORTED_VOCABULARY: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut terms = INGREDIENT_VOCABULARY.to_vec();
    terms.sort_by(|a, b| {
        let words = |t: &str| t.split_whitespace().count();
        words(b)
            .cmp(&words(a))
            .then_with(|| b.chars().count().cmp(&a.chars().count()))
    });
    terms
});

const CUISINE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "asian",
        &[
            "soy", "soja", "sojasauce", "ginger", "ingwer", "curry", "sushi", "teriyaki",
            "kimchi", "miso", "wok", "ramen", "pho", "thai", "asian", "asiatisch", "lemongrass",
            "zitronengras", "sesame", "sesam", "tofu", "bao",
        ],
    ),
    (
        "italian",
        &[
            "pasta", "pizza", "risotto", "mozzarella", "parmesan", "pesto", "lasagne", "lasagna",
            "gnocchi", "italian", "italienisch", "basil", "basilikum", "bruschetta", "tiramisu",
        ],
    ),
    (
        "german",
        &[
            "schnitzel", "wurst", "bratwurst", "sauerkraut", "spätzle", "knödel", "brezel",
            "german", "deutsch", "rotkohl", "kartoffelsalat", "bratkartoffeln", "maultaschen",
        ],
    ),
    ("fusion", &["fusion", "bowl", "poke", "taco", "burrito", "wrap"]),
    (
        "mediterranean",
        &[
            "feta", "olive", "hummus", "halloumi", "falafel", "tzatziki", "couscous",
            "mediterranean", "mediterran", "greek", "griechisch", "aubergine",
        ],
    ),
];

const DIETARY_KEYWORDS: &[(&str, &[&str])] = &[
    ("vegan", &["vegan"]),
    ("vegetarian", &["vegetarian", "vegetarisch", "veggie"]),
    (
        "gluten-free",
        &["gluten-free", "gluten free", "glutenfrei", "ohne gluten"],
    ),
    (
        "lactose-free",
        &[
            "lactose-free", "lactose free", "laktosefrei", "dairy-free", "dairy free",
            "ohne laktose",
        ],
    ),
    ("spicy", &["spicy", "scharf"]),
    ("halal", &["halal"]),
];

const EXPENSIVE_KEYWORDS: &[&str] = &[
    "salmon", "lachs", "beef", "rind", "rindfleisch", "steak", "shrimp", "prawn", "garnelen",
    "tuna", "thunfisch", "truffle", "trüffel", "lamb", "lamm", "duck", "ente", "lobster",
    "hummer", "scallop", "jakobsmuschel",
];

const CHEAP_KEYWORDS: &[&str] = &[
    "rice", "reis", "pasta", "nudeln", "noodles", "potato", "kartoffel", "lentil", "linsen",
    "beans", "bohnen", "bread", "brot", "soup", "suppe",
];

static SPOKEN_PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:€\s*(\d+(?:[.,]\d{1,2})?))|(?:(\d+(?:[.,]\d{1,2})?)\s*(?:€|euros?\b|eur\b))")
        .expect("spoken price pattern is valid")
});

// Sentence punctuation only; the decimal point in "0.50 euro" is not an end
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?](?:\s|$)|\n").expect("sentence end pattern is valid")
});

/// Build a complete dish from local heuristics alone.
pub fn fallback_dish(normalized: &Normalized, raw_text: &str, confidence: f64) -> ParsedDish {
    let text = normalized.text.as_str();
    ParsedDish {
        name: extract_dish_name(text),
        description: describe(text),
        ingredients: extract_basic_ingredients(text),
        cuisine_type: detect_cuisine_type(text),
        dietary_tags: extract_dietary_tags(text),
        estimated_price: estimate_price(text),
        confidence_score: confidence,
        raw_text: raw_text.to_string(),
    }
}

/// First sentence when it is short, otherwise the first four words.
pub fn extract_dish_name(text: &str) -> String {
    let trimmed = text.trim();
    let first_sentence = SENTENCE_END
        .split(trimmed)
        .next()
        .unwrap_or_default()
        .trim();

    let name = if !first_sentence.is_empty() && first_sentence.chars().count() < MAX_NAME_CHARS {
        first_sentence.to_string()
    } else {
        trimmed
            .split_whitespace()
            .take(NAME_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end_matches([',', ';', ':', '.', '!', '?'])
            .to_string()
    };

    if !name.chars().any(char::is_alphanumeric) {
        UNTITLED_DISH.to_string()
    } else {
        name
    }
}

pub fn describe(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_DESCRIPTION_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}

/// Ingredients from the fixed vocabulary, in the order they are mentioned.
pub fn extract_basic_ingredients(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut claimed = vec![false; haystack.len()];
    let mut found: Vec<(usize, &str)> = Vec::new();

    for term in SORTED_VOCABULARY.iter() {
        let mut first_match = None;
        for (start, _) in haystack.match_indices(term) {
            let end = start + term.len();
            if !starts_word(&haystack, start) || claimed[start..end].iter().any(|c| *c) {
                continue;
            }
            claimed[start..end].iter_mut().for_each(|c| *c = true);
            first_match.get_or_insert(start);
        }
        if let Some(position) = first_match {
            found.push((position, term));
        }
    }

    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, term)| term.to_string()).collect()
}

/// Cuisine bucket with the most keyword hits; "fusion" when nothing matches.
pub fn detect_cuisine_type(text: &str) -> String {
    let haystack = text.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for (cuisine, keywords) in CUISINE_KEYWORDS {
        let hits = keywords
            .iter()
            .filter(|keyword| contains_word(&haystack, keyword))
            .count();
        if hits > 0 && best.map_or(true, |(_, best_hits)| hits > best_hits) {
            best = Some((cuisine, hits));
        }
    }

    best.map_or(DEFAULT_CUISINE, |(cuisine, _)| cuisine)
        .to_string()
}

pub fn extract_dietary_tags(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    DIETARY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| contains_word(&haystack, k)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

pub fn estimate_price(text: &str) -> PriceEstimate {
    let haystack = text.to_lowercase();
    let mut price = BASE_PRICE;

    if EXPENSIVE_KEYWORDS.iter().any(|k| contains_word(&haystack, k)) {
        price += EXPENSIVE_SURCHARGE;
    }
    if CHEAP_KEYWORDS.iter().any(|k| contains_word(&haystack, k)) {
        price -= CHEAP_DISCOUNT;
    }
    if haystack.split_whitespace().count() > LONG_DESCRIPTION_WORDS {
        price += LONG_DESCRIPTION_SURCHARGE;
    }

    PriceEstimate::from_regular(price.clamp(MIN_PRICE, MAX_PRICE))
}

/// First explicit price in the transcript, e.g. "12,50 euro" or "€9".
pub fn spoken_price(text: &str) -> Option<f64> {
    let caps = SPOKEN_PRICE_PATTERN.captures(text)?;
    let amount = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let value = amount.replace(',', ".").parse::<f64>().ok()?;
    (value > 0.0).then(|| round_cents(value))
}

fn starts_word(haystack: &str, start: usize) -> bool {
    haystack[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Keyword occurs at the start of a word. Longer keywords may be followed by
/// any suffix ("vegan" in "vegane"); short ones only by a plural ending, so
/// "pho" does not match "photo".
fn contains_word(haystack: &str, keyword: &str) -> bool {
    let short = keyword.chars().count() <= SHORT_KEYWORD_CHARS;
    haystack.match_indices(keyword).any(|(start, _)| {
        starts_word(haystack, start) && (!short || ends_word(haystack, start + keyword.len()))
    })
}

fn ends_word(haystack: &str, end: usize) -> bool {
    let tail: String = haystack[end..]
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect();
    matches!(tail.as_str(), "" | "s" | "es")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use crate::parsing::normalize::normalize_transcript;

    #[test]
    fn test_name_is_short_first_sentence() {
        assert_eq!(
            extract_dish_name("Lemon tart. Buttery crust with lemon curd."),
            "Lemon tart"
        );
    }

    #[test]
    fn test_name_falls_back_to_first_four_words() {
        let text = "Slow roasted pork belly with crackling, apple sauce and braised red cabbage served warm";
        assert_eq!(extract_dish_name(text), "Slow roasted pork belly");
    }

    #[test]
    fn test_name_for_empty_text() {
        assert_eq!(extract_dish_name(""), UNTITLED_DISH);
        assert_eq!(extract_dish_name(" ... "), UNTITLED_DISH);
    }

    #[test]
    fn test_name_keeps_decimal_prices() {
        assert_eq!(
            extract_dish_name("Veggie burger for 9.50 euro"),
            "Veggie burger for 9.50 euro"
        );

        let normalized = normalize_transcript("Linsensuppe für fünfzig cent", Language::German);
        assert_eq!(
            extract_dish_name(&normalized.text),
            "Linsensuppe für 0.50 euro"
        );
    }

    #[test]
    fn test_multi_word_ingredient_preferred() {
        let ingredients = extract_basic_ingredients("salad with red onion and feta");
        assert_eq!(ingredients, vec!["red onion", "feta"]);
    }

    #[test]
    fn test_ingredients_ignore_mid_word_matches() {
        // "reis" inside "preis" and "kartoffel" inside "süßkartoffel"
        let ingredients = extract_basic_ingredients("Süßkartoffel Curry, Preis egal");
        assert_eq!(ingredients, vec!["süßkartoffel"]);
    }

    #[test]
    fn test_ingredients_keep_mention_order_and_dedupe() {
        let ingredients = extract_basic_ingredients("Garlic, tomatoes, more garlic and basil");
        assert_eq!(ingredients, vec!["garlic", "tomato", "basil"]);
    }

    #[test]
    fn test_cuisine_detection() {
        assert_eq!(detect_cuisine_type("Pasta with pesto and parmesan"), "italian");
        assert_eq!(detect_cuisine_type("Tofu with ginger and soy"), "asian");
        assert_eq!(detect_cuisine_type("Schnitzel mit Spätzle"), "german");
        assert_eq!(detect_cuisine_type("Halloumi with hummus"), "mediterranean");
        assert_eq!(detect_cuisine_type("something new"), DEFAULT_CUISINE);
    }

    #[test]
    fn test_short_keywords_need_a_word_end() {
        assert_eq!(detect_cuisine_type("Pasta for the photo shoot"), "italian");
        assert_eq!(detect_cuisine_type("woke salad"), DEFAULT_CUISINE);
        assert_eq!(detect_cuisine_type("wok-fried greens"), "asian");
        assert_eq!(estimate_price("entertaining salad").regular, 8.0);
        assert_eq!(estimate_price("roast ducks").regular, 12.0);
        assert_eq!(estimate_price("Rindfleisch mit Salat").regular, 12.0);
    }

    #[test]
    fn test_dietary_tags() {
        assert_eq!(
            extract_dietary_tags("Vegane Bowl, glutenfrei und scharf"),
            vec!["vegan", "gluten-free", "spicy"]
        );
        assert!(extract_dietary_tags("plain toast").is_empty());
    }

    #[test]
    fn test_price_base_and_adjustments() {
        assert_eq!(estimate_price("green salad").regular, 8.0);
        assert_eq!(estimate_price("grilled salmon").regular, 12.0);
        assert_eq!(estimate_price("salmon with rice").regular, 10.0);
        assert_eq!(estimate_price("vegetable rice").regular, 6.0);
    }

    #[test]
    fn test_price_long_description_surcharge() {
        let long = "word ".repeat(21);
        assert_eq!(estimate_price(&long).regular, 10.0);
    }

    #[test]
    fn test_student_price_is_eighty_percent() {
        for text in ["salad", "beef steak", "rice bowl", "duck"] {
            let price = estimate_price(text);
            assert_eq!(price.student, ((price.regular * 0.8) * 100.0).round() / 100.0);
            assert!((5.0..=25.0).contains(&price.regular));
        }
    }

    #[test]
    fn test_spoken_price() {
        assert_eq!(spoken_price("kostet 12,50 euro"), Some(12.5));
        assert_eq!(spoken_price("only €9 today"), Some(9.0));
        assert_eq!(spoken_price("no price here"), None);
    }

    #[test]
    fn test_fallback_dish_from_german_transcript() {
        let raw = "Äh, Lachs mit Reis und Zitrone. Glutenfrei.";
        let normalized = normalize_transcript(raw, Language::German);
        let dish = fallback_dish(&normalized, raw, 0.2);

        assert_eq!(dish.name, "Lachs mit Reis und Zitrone");
        assert_eq!(dish.ingredients, vec!["lachs", "reis", "zitrone"]);
        assert_eq!(dish.dietary_tags, vec!["gluten-free"]);
        assert_eq!(dish.estimated_price.regular, 10.0);
        assert_eq!(dish.confidence_score, 0.2);
        assert_eq!(dish.raw_text, raw);
    }

    #[test]
    fn test_describe_truncates_long_text() {
        let long = "a".repeat(500);
        assert_eq!(describe(&long).chars().count(), MAX_DESCRIPTION_CHARS + 1);
    }
}
