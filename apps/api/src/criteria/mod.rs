//! Criteria extraction: turns job-description text into an ordered list of
//! evaluable criteria.
//!
//! Two backends implement `CriteriaExtractor`:
//! - `TriggerPhraseExtractor`: keeps sentences containing a trigger phrase.
//! - `LlmCriteriaExtractor`: asks the model for JSON and parses the reply
//!   through an ordered chain of strategies.

use async_trait::async_trait;

use crate::errors::AppError;

pub mod handlers;
pub mod llm;
pub mod parse;
pub mod prompts;
pub mod store;
pub mod trigger;

pub use llm::LlmCriteriaExtractor;
pub use store::{CriteriaSet, CriteriaStore};
pub use trigger::TriggerPhraseExtractor;

/// Upper bound on the number of criteria returned by the model backend.
pub const MAX_EXTRACTED_CRITERIA: usize = 15;

#[async_trait]
pub trait CriteriaExtractor: Send + Sync {
    /// Extracts criteria in source order. An empty list is a valid result
    /// at this layer; the caller decides whether it is an error.
    async fn extract(&self, jd_text: &str) -> Result<Vec<String>, AppError>;
}
