//! Text utilities shared by the lexical extractor, identifier and scorer.
//!
//! Sentence boundaries follow Unicode UAX #29, so a hard line break ends a
//! sentence as well. Resume bullet lines rarely carry a full stop, and each
//! bullet is scored as its own sentence.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

pub mod noun_phrase;

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Splits text into trimmed, non-empty sentences in source order.
pub fn sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalized token set: lowercase, punctuation removed, whitespace-split,
/// stemmed, deduplicated.
pub fn token_set(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|token| STEMMER.stem(token).into_owned())
        .collect()
}

/// Returns at most `max_chars` characters of `text`, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
