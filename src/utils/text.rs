//! Text normalization used at the import boundary and for UI display codes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Institutional prefix ("IQ" + two digits + padding zeros) stripped before
/// obfuscating a registration code for display.
static DISPLAY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[Ii][Qq]\d0+").unwrap());

/// Campus code variants collapsed to the canonical `IQ30` on import.
static CANONICAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"IQ\d{2}").unwrap());

/// Lowercase words never capitalized inside Portuguese names.
const CAPITALIZE_EXCEPTIONS: &[&str] = &[
    "a", "o", "as", "os", "de", "dos", "das", "do", "da", "e", "é", "com", "sem", "ou", "para",
    "por", "no", "na", "nos", "nas",
];

/// Derives the obfuscated display code for a registration code: the
/// institutional prefix is dropped and each remaining digit is substituted
/// by a letter, space-separated. Display only, never a storage key.
pub fn display_code(code: &str) -> String {
    let stripped = DISPLAY_PREFIX.replace_all(code, "");
    let translated: Vec<String> = stripped
        .chars()
        .map(|c| match c {
            '0'..='9' => {
                let offset = c as u8 - b'0';
                ((b'a' + offset) as char).to_string()
            }
            'X' | 'x' => "k".to_string(),
            other => other.to_string(),
        })
        .collect();
    translated.join(" ")
}

/// Canonicalizes a raw registration code: uppercased, campus prefix
/// variants collapsed to `IQ30`.
pub fn canonical_code(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    CANONICAL_PREFIX.replace_all(&upper, "IQ30").into_owned()
}

/// Normalizes an imported column header: trimmed, lowercased, and known
/// spreadsheet variants translated to the canonical key.
pub fn normalize_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    match key.as_str() {
        "matrícula iq" | "matrícula" | "prontuário" => "pront".to_string(),
        "refeição" | "prato" => "dish".to_string(),
        other => other.to_string(),
    }
}

fn capitalize_word(word: &str) -> String {
    let word = word.trim();
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    if CAPITALIZE_EXCEPTIONS.contains(&lower.as_str()) {
        return lower;
    }
    let mut chars = word.chars();
    let first = chars.next().map(|c| c.to_uppercase().to_string());
    match first {
        Some(head) => head + &lower[lower.chars().next().map_or(0, |c| c.len_utf8())..],
        None => String::new(),
    }
}

/// Title-cases a name, keeping Portuguese connective words lowercase.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(capitalize_word)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
