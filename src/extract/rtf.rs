use std::iter::Peekable;
use std::str::Chars;

/// Groups whose contents are metadata rather than document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "headerl",
    "headerr",
    "footer",
    "footerl",
    "footerr",
    "footnote",
    "object",
    "fldinst",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "filetbl",
];

#[derive(Clone, Copy)]
struct GroupState {
    skip: bool,
    unicode_fallback: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            skip: false,
            unicode_fallback: 1,
        }
    }
}

/// Strips RTF control words and groups, keeping the visible text.
pub(crate) fn extract(bytes: &[u8]) -> String {
    let source = String::from_utf8_lossy(bytes);
    let mut chars = source.chars().peekable();

    let mut out = String::new();
    let mut stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState::default();
    let mut group_start = false;
    let mut pending_skip = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                stack.push(state);
                group_start = true;
                continue;
            }
            '}' => {
                state = stack.pop().unwrap_or_default();
                pending_skip = 0;
            }
            '\\' => match chars.peek().copied() {
                Some(next) if next.is_ascii_alphabetic() => {
                    let (word, param) = read_control_word(&mut chars);
                    if group_start && SKIPPED_DESTINATIONS.contains(&word.as_str()) {
                        state.skip = true;
                    }
                    if !state.skip {
                        apply_control_word(&word, param, &mut state, &mut out, &mut pending_skip);
                    }
                }
                Some('*') => {
                    chars.next();
                    state.skip = true;
                }
                Some('\'') => {
                    chars.next();
                    let hex: String = chars.by_ref().take(2).collect();
                    if let Some(ch) = u8::from_str_radix(&hex, 16).ok().and_then(cp1252_char) {
                        emit(ch, &state, &mut out, &mut pending_skip);
                    }
                }
                Some(escaped @ ('\\' | '{' | '}')) => {
                    chars.next();
                    emit(escaped, &state, &mut out, &mut pending_skip);
                }
                Some('~') => {
                    chars.next();
                    emit(' ', &state, &mut out, &mut pending_skip);
                }
                Some('_') => {
                    chars.next();
                    emit('-', &state, &mut out, &mut pending_skip);
                }
                Some('\n' | '\r') => {
                    chars.next();
                    if !state.skip {
                        out.push('\n');
                    }
                }
                Some(_) => {
                    chars.next();
                }
                None => {}
            },
            '\n' | '\r' => {}
            other => emit(other, &state, &mut out, &mut pending_skip),
        }
        group_start = false;
    }

    out
}

fn read_control_word(chars: &mut Peekable<Chars<'_>>) -> (String, Option<i32>) {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut digits = String::new();
    if chars.peek() == Some(&'-') {
        digits.push('-');
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    // A single space terminates the control word and is not part of the text.
    if chars.peek() == Some(&' ') {
        chars.next();
    }

    (word, digits.parse().ok())
}

fn apply_control_word(
    word: &str,
    param: Option<i32>,
    state: &mut GroupState,
    out: &mut String,
    pending_skip: &mut usize,
) {
    match word {
        "par" | "line" | "sect" | "page" => out.push('\n'),
        "tab" => out.push('\t'),
        "emdash" => out.push('\u{2014}'),
        "endash" => out.push('\u{2013}'),
        "bullet" => out.push('\u{2022}'),
        "lquote" => out.push('\u{2018}'),
        "rquote" => out.push('\u{2019}'),
        "ldblquote" => out.push('\u{201C}'),
        "rdblquote" => out.push('\u{201D}'),
        "uc" => {
            if let Some(n) = param {
                state.unicode_fallback = usize::try_from(n).unwrap_or(0);
            }
        }
        "u" => {
            if let Some(n) = param {
                let code = if n < 0 { n + 65_536 } else { n };
                if let Some(ch) = u32::try_from(code).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
                *pending_skip = state.unicode_fallback;
            }
        }
        _ => {}
    }
}

/// Decodes a `\'hh` byte as Windows-1252, the code page of `\ansi` documents.
/// Bytes the code page leaves undefined yield nothing.
fn cp1252_char(byte: u8) -> Option<char> {
    const HIGH_PUNCTUATION: [Option<char>; 32] = [
        Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
        Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
        Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
        Some('\u{0152}'), None, Some('\u{017D}'), None,
        None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
        Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
        Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
        Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
    ];
    match byte {
        0x80..=0x9F => HIGH_PUNCTUATION[usize::from(byte - 0x80)],
        _ => Some(char::from(byte)),
    }
}

fn emit(c: char, state: &GroupState, out: &mut String, pending_skip: &mut usize) {
    if state.skip {
        return;
    }
    if *pending_skip > 0 {
        *pending_skip -= 1;
        return;
    }
    out.push(c);
}
