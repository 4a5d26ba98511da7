//! Lowercase alphanumeric tokenizer shared by the ranking engine and evaluation.

use std::collections::HashSet;

/// Function words dropped when measuring answer grounding.
/// The ranking engine keeps them; only faithfulness scoring filters.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "for", "with", "by", "is", "are",
    "was", "were", "that", "this", "it", "as", "at", "from", "into", "can", "be", "about",
    "which",
];

/// Tokenize text: lowercase, then keep maximal runs of alphanumeric characters.
///
/// Punctuation, whitespace and symbols all act as separators. No stop word
/// removal and no stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in lower.char_indices() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(lower[s..i].to_string());
        }
    }
    if let Some(s) = start {
        tokens.push(lower[s..].to_string());
    }

    tokens
}

/// Distinct tokens of `text`.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Distinct tokens of `text` with [`STOP_WORDS`] removed.
pub fn content_token_set(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}
