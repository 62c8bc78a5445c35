use docsum::core::models::Style;
use docsum::prompt::{
    SYSTEM_PROMPT, build_prompt, estimate_tokens, sanitize_input, style_instruction,
    truncate_chars,
};

#[test]
fn test_build_prompt_layout() {
    let prompt = build_prompt(Style::Brief, "The text.");
    assert_eq!(
        prompt,
        "Summarize the following text in 2-4 concise sentences, focusing on main points and outcomes.\
         \n\nText to summarize:\n\"\"\"\nThe text.\n\"\"\"\n\nSummary:"
    );
}

#[test]
fn test_each_style_has_its_own_instruction() {
    let brief = style_instruction(Style::Brief);
    let detailed = style_instruction(Style::Detailed);
    let bullets = style_instruction(Style::Bullets);

    assert!(detailed.starts_with("Provide a detailed summary"));
    assert!(bullets.contains("bullet points"));
    assert_ne!(brief, detailed);
    assert_ne!(detailed, bullets);
    assert!(!SYSTEM_PROMPT.is_empty());
}

#[test]
fn test_sanitize_input_keeps_line_structure() {
    let input = "Line one\u{0000}\nLine\ttwo\u{007F}\r\n";
    assert_eq!(sanitize_input(input), "Line one\nLine\ttwo\r\n");
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo wörld", 4), "héll");
    assert_eq!(truncate_chars("short", 50), "short");
}

#[test]
fn test_estimate_tokens() {
    assert_eq!(estimate_tokens(""), 1);
    assert_eq!(estimate_tokens(&"a".repeat(400)), 101);
}
