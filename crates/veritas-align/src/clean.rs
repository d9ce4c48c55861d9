//! Cleanup of generated text before alignment.
//!
//! Generated answers often arrive through JSON and keep literal escape sequences (`\n`,
//! `\u00e9`) or loose punctuation spacing, both of which would cost similarity against the
//! verbatim source sentences.

use std::sync::LazyLock;

use regex::Regex;

/// Literal escape sequences and their replacements, applied in order.
static ESCAPES: &[(&str, &str)] = &[
    ("\\n", " "),
    ("\\t", " "),
    ("\\r", ""),
    ("\\\"", "\""),
    ("\\'", "'"),
    ("\\\\", "\\"),
    ("\\u00e9", "é"),
    ("\\u00e8", "è"),
    ("\\u00ea", "ê"),
    ("\\u00e0", "à"),
    ("\\u00e2", "â"),
    ("\\u00e7", "ç"),
    ("\\u00f4", "ô"),
    ("\\u00fb", "û"),
    ("\\u00ee", "î"),
    ("\\u00ef", "ï"),
    ("\\u00fc", "ü"),
    ("\\u0153", "œ"),
    ("\\u2019", "'"),
    ("\\u2026", "..."),
];

/// `\u` followed by four hex digits, left over after the known escapes are decoded.
static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u[0-9a-fA-F]{4}").expect("invalid UNICODE_ESCAPE"));
/// Runs of whitespace.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid WHITESPACE"));
/// Whitespace before closing punctuation.
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?)])").expect("invalid SPACE_BEFORE_PUNCT"));
/// Closing punctuation glued to the next character.
static GLUED_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,.;:!?)])(\S)").expect("invalid GLUED_PUNCT"));

/// Normalizes generated text for comparison with source sentences.
///
/// Decodes common escape sequences, drops any other `\uXXXX` escape, collapses whitespace,
/// removes spaces before closing punctuation and inserts one after it.
pub fn clean_generated(text: &str) -> String {
    let mut text = text.to_string();
    for (escape, replacement) in ESCAPES {
        if text.contains(escape) {
            text = text.replace(escape, replacement);
        }
    }

    let text = UNICODE_ESCAPE.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    // Matches cannot overlap, so punctuation consumed as the follower of another
    // punctuation mark is only spaced on the second pass.
    let text = GLUED_PUNCT.replace_all(&text, "$1 $2");
    let text = GLUED_PUNCT.replace_all(&text, "$1 $2");
    text.trim().to_string()
}
