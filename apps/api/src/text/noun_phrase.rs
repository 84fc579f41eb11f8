//! Shallow noun-phrase chunking used for human-readable report column titles.
//!
//! A chunk is a maximal run of words containing no function word, auxiliary,
//! or requirement verb. The last chunk of a criterion is usually its object,
//! e.g. "Must have 5 years of Python experience." -> "Python Experience".

use std::collections::HashSet;

use once_cell::sync::Lazy;

static CHUNK_BREAKS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // determiners
        "a", "an", "the", "any", "all", "some", "each", "every", "this", "that", "these", "those",
        // prepositions
        "of", "in", "on", "at", "for", "with", "to", "from", "by", "as", "into", "including",
        "such", "like", "about", "across", "within", "over", "under", "per", "via", "through",
        // conjunctions
        "and", "or", "but", "nor", "plus", "&", "/",
        // auxiliaries and modals
        "must", "should", "will", "would", "can", "could", "may", "might", "shall", "is", "are",
        "be", "been", "being", "was", "were", "have", "has", "had", "having", "do", "does",
        // pronouns
        "you", "we", "they", "our", "your", "their", "it", "its", "who", "which", "what",
        // adverbs
        "strongly", "highly", "preferably", "least", "more", "than", "also", "well", "very",
        "ideally", "etc", "e.g", "i.e",
        // requirement verbs
        "required", "preferred", "needed", "desired", "demonstrated", "proven", "equivalent",
        "considered",
    ]
    .into_iter()
    .collect()
});

/// Returns the last noun phrase of `text`, title-cased, if there is one.
pub fn last_noun_phrase(text: &str) -> Option<String> {
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'));
        let is_break = word.is_empty() || CHUNK_BREAKS.contains(word.to_lowercase().as_str());

        if is_break {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(word);
        }

        // Sentence-internal punctuation closes the chunk after this word.
        if raw.ends_with(|c: char| matches!(c, ',' | ';' | ':' | '(' | ')')) && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .rev()
        .find(|chunk| chunk.iter().any(|w| w.chars().any(char::is_alphabetic)))
        .map(|chunk| chunk.iter().map(|w| title_word(w)).collect::<Vec<_>>().join(" "))
}

/// Upper-cases the first letter and leaves the rest untouched, so acronyms
/// such as "SQL" or "AWS" survive.
fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_noun_phrase_of_requirement_sentence() {
        assert_eq!(
            last_noun_phrase("Must have 5 years of Python experience.").as_deref(),
            Some("Python Experience")
        );
    }

    #[test]
    fn test_trailing_requirement_verb_is_skipped() {
        assert_eq!(
            last_noun_phrase("Kubernetes certification required").as_deref(),
            Some("Kubernetes Certification")
        );
    }

    #[test]
    fn test_acronyms_are_preserved() {
        assert_eq!(
            last_noun_phrase("Strong knowledge of SQL databases.").as_deref(),
            Some("SQL Databases")
        );
    }

    #[test]
    fn test_degree_sentence() {
        assert_eq!(
            last_noun_phrase("Bachelor's degree in Computer Science or equivalent.").as_deref(),
            Some("Computer Science")
        );
    }

    #[test]
    fn test_comma_closes_chunk() {
        assert_eq!(
            last_noun_phrase("Skills: Rust, Go").as_deref(),
            Some("Go")
        );
    }

    #[test]
    fn test_no_phrase_in_function_words() {
        assert_eq!(last_noun_phrase("must be of the"), None);
        assert_eq!(last_noun_phrase("5 - 10"), None);
    }
}
