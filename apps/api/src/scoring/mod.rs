//! Resume scoring: candidate naming and per-criterion scores in [0, 5].
//!
//! Backends are swapped at startup through the `CandidateIdentifier` and
//! `ResumeScorer` traits; `batch::score_batch` drives them over a request's
//! resumes.

use async_trait::async_trait;

use crate::errors::AppError;

pub mod batch;
pub mod handlers;
pub mod lexical;
pub mod llm;
pub mod names;
pub mod prompts;

pub use lexical::LexicalScorer;
pub use llm::{LlmCandidateIdentifier, LlmScorer};
pub use names::PersonNameRecognizer;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 5;

#[async_trait]
pub trait CandidateIdentifier: Send + Sync {
    async fn identify(&self, resume_text: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait ResumeScorer: Send + Sync {
    /// Scores one resume against every criterion. Returns one score per
    /// criterion, in criteria order.
    async fn score(&self, resume_text: &str, criteria: &[String]) -> Result<Vec<u8>, AppError>;
}

/// Forces a raw score into [0, 5]. This is the only way a number coming from
/// outside (model output, float rounding) becomes a score.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}
