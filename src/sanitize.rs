//! Normalisation of user-authored text before it is embedded in a
//! document.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("static regex"));
static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("static regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ([.,;:!?])").expect("static regex"));

/// Normalises line endings, collapses blank lines and inline whitespace,
/// removes stray spaces before punctuation and trims the result.
///
/// Lossy and idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let text = input.replace("\r\n", "\n").replace('\r', "\n");
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = INLINE_SPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Splits sanitised text into non-empty paragraphs, one per line.
pub fn paragraphs(input: &str) -> Vec<String> {
    sanitize(input)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reads a form field that may arrive as a string, number, boolean or null.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}
