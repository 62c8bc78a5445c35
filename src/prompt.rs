use crate::core::models::Style;

/// System message sent ahead of every summarization prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful summarization assistant.";

const BRIEF_INSTRUCTION: &str =
    "Summarize the following text in 2-4 concise sentences, focusing on main points and outcomes.";

const DETAILED_INSTRUCTION: &str = "Provide a detailed summary of the following text. Explain the main points, context, \
     and any implications. Use clear paragraphs and make sure key facts are included.";

const BULLETS_INSTRUCTION: &str = "Summarize the following text as concise bullet points. \
     Each bullet should be short and focus on one idea.";

#[must_use]
pub fn style_instruction(style: Style) -> &'static str {
    match style {
        Style::Brief => BRIEF_INSTRUCTION,
        Style::Detailed => DETAILED_INSTRUCTION,
        Style::Bullets => BULLETS_INSTRUCTION,
    }
}

/// Renders the user message: instruction, the quoted text, then a `Summary:` cue.
#[must_use]
pub fn build_prompt(style: Style, text: &str) -> String {
    format!(
        "{}\n\nText to summarize:\n\"\"\"\n{}\n\"\"\"\n\nSummary:",
        style_instruction(style),
        text
    )
}

/// Strips control characters but keeps line structure intact.
#[must_use]
pub fn sanitize_input(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Cuts `text` to at most `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}
