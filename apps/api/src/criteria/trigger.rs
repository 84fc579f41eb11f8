use async_trait::async_trait;

use super::CriteriaExtractor;
use crate::errors::AppError;
use crate::text::sentences;

/// Phrases whose presence marks a sentence as criterion-bearing.
pub const TRIGGER_PHRASES: &[&str] = &[
    "must have",
    "required",
    "qualifications",
    "experience",
    "skills",
    "certification",
    "proficient",
    "knowledge of",
    "ability to",
    "degree in",
    "years of",
];

/// Lexical criteria extractor. No deduplication and no ranking: the output
/// order is the sentence order of the job description.
pub struct TriggerPhraseExtractor;

#[async_trait]
impl CriteriaExtractor for TriggerPhraseExtractor {
    async fn extract(&self, jd_text: &str) -> Result<Vec<String>, AppError> {
        Ok(extract_trigger_sentences(jd_text))
    }
}

pub fn extract_trigger_sentences(text: &str) -> Vec<String> {
    sentences(text)
        .into_iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            TRIGGER_PHRASES.iter().any(|trigger| lower.contains(trigger))
        })
        .map(str::to_string)
        .collect()
}
