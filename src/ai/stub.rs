use async_trait::async_trait;

use super::provider::SummaryProvider;
use crate::core::models::{Style, SummarizeRequest};
use crate::errors::SummarizeError;

pub const STUB_PROVIDER_NAME: &str = "stub";

const BRIEF_SENTENCES: usize = 2;
const DETAILED_SENTENCES: usize = 4;
const DETAILED_MAX_WORDS: usize = 120;
const BULLET_MAX: usize = 5;
const BULLET_MAX_WORDS: usize = 12;

/// Deterministic, offline summaries for local development and as a fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubProvider;

impl StubProvider {
    #[must_use]
    pub fn summarize_text(text: &str, style: Style) -> String {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return "[STUB] (no usable sentences found in text)".to_string();
        }

        match style {
            Style::Brief => {
                let out = sentences
                    .iter()
                    .take(BRIEF_SENTENCES)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("[STUB - brief] {out}")
            }
            Style::Detailed => {
                let joined = sentences
                    .iter()
                    .take(DETAILED_SENTENCES)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                format!(
                    "[STUB - detailed] {}",
                    clip_words(&joined, DETAILED_MAX_WORDS)
                )
            }
            Style::Bullets => {
                let bullets = sentences
                    .iter()
                    .take(BULLET_MAX)
                    .map(|s| format!("- {}", clip_words(s, BULLET_MAX_WORDS)))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("[STUB - bullets]\n{bullets}")
            }
        }
    }
}

#[async_trait]
impl SummaryProvider for StubProvider {
    fn name(&self) -> &str {
        STUB_PROVIDER_NAME
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<String, SummarizeError> {
        Ok(Self::summarize_text(&request.text, request.style))
    }
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = idx + c.len_utf8();
            sentences.push(text[start..end].trim());
            start = end;
        }
    }
    sentences.push(text[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

fn clip_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Revenue rose 12% in Q3. Costs were flat! Will growth continue? \
                        Analysts think so. Guidance was raised. Shares jumped.";

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = split_sentences("One. Two!  Three?\nFour");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
        assert_eq!(split_sentences("v1.2 is out."), vec!["v1.2 is out."]);
    }

    #[test]
    fn brief_takes_two_sentences() {
        assert_eq!(
            StubProvider::summarize_text(TEXT, Style::Brief),
            "[STUB - brief] Revenue rose 12% in Q3. Costs were flat!"
        );
    }

    #[test]
    fn detailed_caps_word_count() {
        let long = format!("{}.", "word ".repeat(200).trim_end());
        let out = StubProvider::summarize_text(&long, Style::Detailed);
        assert!(out.starts_with("[STUB - detailed] "));
        assert!(out.ends_with("..."));
        let body = out.trim_start_matches("[STUB - detailed] ");
        assert_eq!(body.split_whitespace().count(), DETAILED_MAX_WORDS);
    }

    #[test]
    fn bullets_are_limited_to_five() {
        let out = StubProvider::summarize_text(TEXT, Style::Bullets);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[STUB - bullets]");
        assert_eq!(lines.len(), 1 + BULLET_MAX);
        assert!(lines[1..].iter().all(|l| l.starts_with("- ")));
    }

    #[test]
    fn whitespace_only_text_has_no_sentences() {
        assert_eq!(
            StubProvider::summarize_text("   ", Style::Brief),
            "[STUB] (no usable sentences found in text)"
        );
    }
}
