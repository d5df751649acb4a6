//! Lexical pre-pass over raw speech transcripts.
//!
//! Runs before any extraction, remote or local: filler words are dropped,
//! stuttered tokens collapse to their final form, and in German mode number
//! words and currency idioms are rewritten to digits.

use crate::model::Language;
use regex::Regex;
use std::sync::LazyLock;

const FILLER_WORDS: &[&str] = &[
    "uh", "uhh", "uhm", "um", "umm", "hm", "hmm", "mhm", "äh", "ähm", "öh", "ehm",
];

// "er" is a pronoun in German, so these only apply to English transcripts
const ENGLISH_FILLER_WORDS: &[&str] = &["er", "erm"];

const GERMAN_NUMBER_WORDS: &[(&str, &str)] = &[
    ("ein", "1"),
    ("eine", "1"),
    ("einen", "1"),
    ("einem", "1"),
    ("einer", "1"),
    ("zwei", "2"),
    ("drei", "3"),
    ("vier", "4"),
    ("fünf", "5"),
    ("sechs", "6"),
    ("sieben", "7"),
    ("acht", "8"),
    ("neun", "9"),
    ("zehn", "10"),
    ("elf", "11"),
    ("zwölf", "12"),
    ("zwanzig", "20"),
    ("dreißig", "30"),
    ("fünfzig", "50"),
    ("hundert", "100"),
];

static CENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*cents?\b").expect("cent pattern is valid")
});

static CURRENCY_AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:€\s*\d+(?:[.,]\d+)?)|(?:\d+(?:[.,]\d+)?\s*(?:€|euros?\b|eur\b))")
        .expect("currency pattern is valid")
});

// "2 euro 50": a second amount trailing the currency word
static COMPOUND_AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s*(?:€|euros?\b|eur\b)\s+\d").expect("compound amount pattern is valid")
});

/// Transcript after the lexical pre-pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    /// More than one currency amount was spoken, or an amount was split
    /// around the currency word ("2 euro 50"). The amounts are left separate
    /// and the result should be treated as low confidence.
    pub ambiguous: bool,
}

pub fn normalize_transcript(text: &str, language: Language) -> Normalized {
    let tokens: Vec<String> = text
        .split_whitespace()
        .filter(|token| !is_filler(token, language))
        .map(collapse_stutter)
        .map(|token| match language {
            Language::German => replace_number_word(&token),
            Language::English => token,
        })
        .collect();

    let mut normalized = tokens.join(" ");

    if language == Language::German {
        normalized = CENT_PATTERN
            .replace_all(&normalized, |caps: &regex::Captures| {
                let cents = caps[1].replace(',', ".").parse::<f64>().unwrap_or(0.0);
                format!("{:.2} euro", cents / 100.0)
            })
            .into_owned();
        normalized = price_bare_euro(&normalized);
    }

    let ambiguous = CURRENCY_AMOUNT_PATTERN.find_iter(&normalized).count() > 1
        || COMPOUND_AMOUNT_PATTERN.is_match(&normalized);

    Normalized {
        text: normalized,
        ambiguous,
    }
}

/// Split a token into leading punctuation, core word and trailing punctuation.
fn split_punctuation(token: &str) -> (&str, &str, &str) {
    let is_punct = |c: char| !c.is_alphanumeric() && c != '-' && c != '€';
    let core_start = token.find(|c: char| !is_punct(c)).unwrap_or(token.len());
    let core_end = token
        .rfind(|c: char| !is_punct(c))
        .map(|i| i + token[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(core_start);
    if core_end <= core_start {
        return (token, "", "");
    }
    (
        &token[..core_start],
        &token[core_start..core_end],
        &token[core_end..],
    )
}

fn is_filler(token: &str, language: Language) -> bool {
    let (_, core, _) = split_punctuation(token);
    let core = core.to_lowercase();
    FILLER_WORDS.contains(&core.as_str())
        || (language == Language::English && ENGLISH_FILLER_WORDS.contains(&core.as_str()))
}

/// `le-le-lemon` becomes `lemon`. Hyphenated words whose leading parts are
/// not prefixes of the last part (`gluten-free`) are left alone.
fn collapse_stutter(token: &str) -> String {
    let (lead, core, trail) = split_punctuation(token);
    let parts: Vec<&str> = core.split('-').collect();
    let Some((last, repeats)) = parts.split_last() else {
        return token.to_string();
    };
    if repeats.is_empty() || last.is_empty() {
        return token.to_string();
    }
    let last_lower = last.to_lowercase();
    let stuttered = repeats
        .iter()
        .all(|part| !part.is_empty() && last_lower.starts_with(&part.to_lowercase()));
    if stuttered {
        format!("{}{}{}", lead, last, trail)
    } else {
        token.to_string()
    }
}

fn replace_number_word(token: &str) -> String {
    let (lead, core, trail) = split_punctuation(token);
    let lower = core.to_lowercase();
    match GERMAN_NUMBER_WORDS.iter().find(|(word, _)| *word == lower) {
        Some((_, digits)) => format!("{}{}{}", lead, digits, trail),
        None => token.to_string(),
    }
}

/// A bare "euro" with no amount in front of it means one euro.
fn price_bare_euro(text: &str) -> String {
    let mut output: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let (_, core, _) = split_punctuation(token);
        if core.eq_ignore_ascii_case("euro") {
            let has_amount = output
                .last()
                .map(|prev| is_amount(split_punctuation(prev).1))
                .unwrap_or(false);
            if !has_amount {
                output.push("1.00".to_string());
            }
        }
        output.push(token.to_string());
    }
    output.join(" ")
}

fn is_amount(token: &str) -> bool {
    !token.is_empty() && token.replace(',', ".").parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(text: &str) -> String {
        normalize_transcript(text, Language::English).text
    }

    fn de(text: &str) -> String {
        normalize_transcript(text, Language::German).text
    }

    #[test]
    fn test_strips_filler_words() {
        assert_eq!(en("uh grilled um salmon, er, with rice"), "grilled salmon, with rice");
        assert_eq!(de("äh Lachs ähm mit Reis"), "Lachs mit Reis");
    }

    #[test]
    fn test_german_keeps_pronoun_er() {
        assert_eq!(de("er kocht"), "er kocht");
    }

    #[test]
    fn test_collapses_stutter_to_final_token() {
        assert_eq!(en("le-le-lemon tart"), "lemon tart");
        assert_eq!(en("with to-tomatoes."), "with tomatoes.");
        assert_eq!(en("gluten-free bread"), "gluten-free bread");
    }

    #[test]
    fn test_german_number_words() {
        assert_eq!(de("eine Suppe mit fünf Tomaten"), "1 Suppe mit 5 Tomaten");
        assert_eq!(de("zwölf Stück"), "12 Stück");
    }

    #[test]
    fn test_number_words_untouched_in_english() {
        assert_eq!(en("ein fünf"), "ein fünf");
    }

    #[test]
    fn test_cent_becomes_euro_fraction() {
        let normalized = normalize_transcript("kostet 50 cent", Language::German);
        assert_eq!(normalized.text, "kostet 0.50 euro");
        assert!(!normalized.ambiguous);
    }

    #[test]
    fn test_bare_euro_is_one_euro() {
        assert_eq!(de("kostet euro"), "kostet 1.00 euro");
        assert_eq!(de("kostet ein euro"), "kostet 1 euro");
        assert_eq!(de("kostet 9 Euro"), "kostet 9 Euro");
    }

    #[test]
    fn test_compound_amounts_are_flagged_not_combined() {
        let normalized = normalize_transcript("fünfzig cent und ein euro", Language::German);
        assert_eq!(normalized.text, "0.50 euro und 1 euro");
        assert!(normalized.ambiguous);
    }

    #[test]
    fn test_euro_and_cents_split_around_currency_word_is_flagged() {
        let normalized = normalize_transcript("Schnitzel für zwei euro fünfzig", Language::German);
        assert_eq!(normalized.text, "Schnitzel für 2 euro 50");
        assert!(normalized.ambiguous);

        let single = normalize_transcript("Schnitzel für zwölf euro", Language::German);
        assert!(!single.ambiguous);
    }

    #[test]
    fn test_handles_empty_and_non_latin() {
        assert_eq!(en(""), "");
        assert_eq!(en("   "), "");
        assert_eq!(en("拉面 和 鸡蛋"), "拉面 和 鸡蛋");
        assert_eq!(en("... — !!"), "... — !!");
    }
}
