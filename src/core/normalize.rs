//! Free-text canonicalization shared by every extractor.

use crate::domain::model::SENTINEL;

const SMALL_WORDS: &[&str] = &[
    "and", "or", "of", "the", "in", "on", "for", "to", "at", "by", "with",
];

const ALIASES: &[(&str, &str)] = &[
    ("Us", "United States"),
    ("U.S.", "United States"),
    ("Usa", "United States"),
    ("Uk", "United Kingdom"),
    ("England", "United Kingdom"),
];

/// Collapses whitespace runs and trims; blank input becomes the sentinel.
pub fn clean(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        SENTINEL.to_string()
    } else {
        collapsed
    }
}

pub fn clean_opt(value: Option<&str>) -> String {
    value.map(clean).unwrap_or_else(|| SENTINEL.to_string())
}

/// `clean`, with the sentinel mapped to `None`.
pub fn resolved(value: &str) -> Option<String> {
    let cleaned = clean(value);
    if is_sentinel(&cleaned) {
        None
    } else {
        Some(cleaned)
    }
}

pub fn is_sentinel(value: &str) -> bool {
    value == SENTINEL
}

pub fn or_sentinel(value: Option<String>) -> String {
    value.unwrap_or_else(|| SENTINEL.to_string())
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() <= 5
        && word.chars().any(char::is_uppercase)
        && !word.chars().any(char::is_lowercase)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Title-cases with acronym and small-word exceptions, then applies the
/// country alias table.
pub fn title_case(text: &str) -> String {
    let text = clean(text);
    if is_sentinel(&text) {
        return text;
    }

    let titled = text
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            if is_acronym(word) {
                word.to_string()
            } else if i > 0 && SMALL_WORDS.contains(&word.to_lowercase().as_str()) {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == titled)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(titled)
}

/// Truncates to at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
