use crate::model::Language;

/// Instruction prompt for turning a dish transcript into JSON.
///
/// Kept in `prompt.txt` and embedded at compile time so the wording can be
/// edited without touching Rust string syntax.
pub const DISH_PARSER_PROMPT: &str = include_str!("prompt.txt");

/// Build the system prompt for a transcript language and optional context.
pub fn build_dish_prompt(language: Language, context: Option<&str>) -> String {
    let mut prompt = DISH_PARSER_PROMPT.to_string();

    if language == Language::German {
        prompt.push_str(
            "\nThe transcript is in German. Keep the dish name, description and ingredient names in German. \
             Numbers and cent amounts have already been converted to digits and euro.\n",
        );
    }

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!(
            "\nThe dish is being entered as: {context}. Shape the name and description for that use.\n"
        ));
    }

    prompt
}
