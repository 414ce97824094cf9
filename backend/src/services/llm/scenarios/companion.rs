//! Companion Scenario - category-focused emotional support replies

use crate::models::Language;
use crate::services::llm::ChatMessage;

const PROMPT_EN: &str = include_str!("companion_en.md");
const PROMPT_ML: &str = include_str!("companion_ml.md");

const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Build the system prompt for `category` in `language`.
///
/// Pure: identical inputs always yield the identical prompt.
pub fn build_system_prompt(category: &str, language: Language) -> String {
    let template = match language {
        Language::English => PROMPT_EN,
        Language::Malayalam => PROMPT_ML,
    };
    template.replace(CATEGORY_PLACEHOLDER, category)
}

/// System prompt followed by the user's text
pub fn build_messages(category: &str, language: Language, user_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt(category, language)),
        ChatMessage::user(user_text),
    ]
}
