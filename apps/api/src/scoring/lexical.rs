//! Lexical resume scorer.
//!
//! Algorithm, per criterion:
//! 1. Normalize the criterion into a stemmed token set.
//! 2. Normalize every resume sentence the same way.
//! 3. Take the maximum Jaccard similarity over all sentences.
//! 4. score = round_half_even(max_similarity × 5)
//!
//! Max-pooling: one strongly matching sentence is enough, and matches spread
//! thinly over many sentences earn nothing extra.

use std::collections::HashSet;
use std::hash::Hash;

use async_trait::async_trait;

use super::{clamp_score, ResumeScorer, MAX_SCORE};
use crate::errors::AppError;
use crate::text::{sentences, token_set};

/// Pure-Rust scorer. Deterministic, no external calls.
pub struct LexicalScorer;

#[async_trait]
impl ResumeScorer for LexicalScorer {
    async fn score(&self, resume_text: &str, criteria: &[String]) -> Result<Vec<u8>, AppError> {
        Ok(score_resume(resume_text, criteria))
    }
}

/// |A ∩ B| / |A ∪ B|, defined as 0 when both sets are empty.
pub fn jaccard_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Scores one resume against each criterion. Resume sentences are
/// normalized once and shared across criteria.
pub fn score_resume(resume_text: &str, criteria: &[String]) -> Vec<u8> {
    let sentence_sets: Vec<HashSet<String>> =
        sentences(resume_text).into_iter().map(token_set).collect();

    criteria
        .iter()
        .map(|criterion| score_criterion(criterion, &sentence_sets))
        .collect()
}

pub fn score_criterion(criterion: &str, sentence_sets: &[HashSet<String>]) -> u8 {
    let criterion_set = token_set(criterion);
    let best = sentence_sets
        .iter()
        .map(|sentence| jaccard_similarity(&criterion_set, sentence))
        .fold(0.0_f64, f64::max);
    similarity_to_score(best)
}

/// Maps a similarity in [0, 1] to a score. Ties round to even (2.5 -> 2).
pub fn similarity_to_score(similarity: f64) -> u8 {
    clamp_score((similarity * MAX_SCORE as f64).round_ties_even() as i64)
}
