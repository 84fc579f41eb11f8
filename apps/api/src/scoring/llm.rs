//! Model-backed candidate naming and scoring.
//!
//! Model output never reaches the report unchecked: names go through
//! `validate_candidate_name`, scores through `parse_score_reply`, which
//! clamps into [0, 5].

use async_trait::async_trait;
use tracing::debug;

use super::names::validate_candidate_name;
use super::prompts::{NAME_PROMPT_TEMPLATE, NAME_SYSTEM, SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};
use super::{clamp_score, CandidateIdentifier, ResumeScorer};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::text::truncate_chars;

/// Characters of resume sent for naming.
pub const NAME_PROMPT_CHARS: usize = 3_000;
/// Characters of resume sent for scoring.
pub const SCORE_PROMPT_CHARS: usize = 5_000;

const NAME_MAX_TOKENS: u32 = 32;
const SCORE_MAX_TOKENS: u32 = 8;

pub struct LlmCandidateIdentifier {
    llm: LlmClient,
}

impl LlmCandidateIdentifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CandidateIdentifier for LlmCandidateIdentifier {
    async fn identify(&self, resume_text: &str) -> Result<String, AppError> {
        let prompt = NAME_PROMPT_TEMPLATE
            .replace("{resume_text}", truncate_chars(resume_text, NAME_PROMPT_CHARS));
        let reply = self
            .llm
            .complete(&prompt, NAME_SYSTEM, NAME_MAX_TOKENS)
            .await?;
        Ok(validate_candidate_name(&reply))
    }
}

pub struct LlmScorer {
    llm: LlmClient,
}

impl LlmScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn score_one(&self, resume_excerpt: &str, criterion: &str) -> Result<u8, AppError> {
        // criterion first: the excerpt may itself contain the placeholder text
        let prompt = SCORE_PROMPT_TEMPLATE
            .replace("{criterion}", criterion)
            .replace("{resume_text}", resume_excerpt);
        let reply = self
            .llm
            .complete(&prompt, SCORE_SYSTEM, SCORE_MAX_TOKENS)
            .await?;
        let score = parse_score_reply(&reply)?;
        debug!("Criterion '{criterion}' scored {score} (raw reply {reply:?})");
        Ok(score)
    }
}

#[async_trait]
impl ResumeScorer for LlmScorer {
    async fn score(&self, resume_text: &str, criteria: &[String]) -> Result<Vec<u8>, AppError> {
        let excerpt = truncate_chars(resume_text, SCORE_PROMPT_CHARS);
        let mut scores = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            scores.push(self.score_one(excerpt, criterion).await?);
        }
        Ok(scores)
    }
}

/// Parses a numeric model reply and clamps it into [0, 5]. A trailing period
/// is tolerated and decimals are rounded; anything else is an error.
pub fn parse_score_reply(reply: &str) -> Result<u8, AppError> {
    let cleaned = reply.trim().trim_end_matches('.');

    if let Ok(n) = cleaned.parse::<i64>() {
        return Ok(clamp_score(n));
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(clamp_score(f.round() as i64)),
        _ => Err(AppError::Llm(format!("non-numeric score reply: {reply:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::{client, FakeTransport, Reply};

    fn criteria(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_score_reply_clamps() {
        assert_eq!(parse_score_reply("4").unwrap(), 4);
        assert_eq!(parse_score_reply(" 3.\n").unwrap(), 3);
        assert_eq!(parse_score_reply("9").unwrap(), 5);
        assert_eq!(parse_score_reply("-3").unwrap(), 0);
        assert_eq!(parse_score_reply("4.6").unwrap(), 5);
    }

    #[test]
    fn test_parse_score_reply_rejects_text() {
        assert!(parse_score_reply("four").is_err());
        assert!(parse_score_reply("Score: 4").is_err());
        assert!(parse_score_reply("NaN").is_err());
    }

    #[tokio::test]
    async fn test_scores_each_criterion_in_order() {
        let transport = Arc::new(FakeTransport::new(vec![
            Reply::text("5"),
            Reply::text("12"),
            Reply::text("0"),
        ]));
        let scorer = LlmScorer::new(client(transport.clone()));

        let scores = scorer
            .score("resume", &criteria(&["Rust", "Go", "COBOL"]))
            .await
            .unwrap();
        assert_eq!(scores, vec![5, 5, 0]);

        let prompts = transport.prompts();
        assert!(prompts[0].contains("CRITERION:\nRust"));
        assert!(prompts[2].contains("CRITERION:\nCOBOL"));
    }

    #[tokio::test]
    async fn test_non_numeric_reply_fails_the_resume() {
        let transport = Arc::new(FakeTransport::new(vec![
            Reply::text("3"),
            Reply::text("It depends"),
        ]));
        let scorer = LlmScorer::new(client(transport));

        let err = scorer
            .score("resume", &criteria(&["Rust", "Go"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_score_prompt_truncates_resume() {
        let transport = Arc::new(FakeTransport::always(Reply::text("1")));
        let scorer = LlmScorer::new(client(transport.clone()));

        let resume = format!("{}TAIL_MARKER", "r".repeat(SCORE_PROMPT_CHARS));
        scorer.score(&resume, &criteria(&["Rust"])).await.unwrap();
        assert!(!transport.prompts()[0].contains("TAIL_MARKER"));
    }

    #[tokio::test]
    async fn test_identifier_validates_reply() {
        let transport = Arc::new(FakeTransport::new(vec![
            Reply::text("John Smith"),
            Reply::text("the candidate is john"),
        ]));
        let identifier = LlmCandidateIdentifier::new(client(transport));

        assert_eq!(identifier.identify("resume").await.unwrap(), "John Smith");
        assert_eq!(
            identifier.identify("resume").await.unwrap(),
            "Unknown Candidate"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_identifier_propagates_unavailable_model() {
        let transport = Arc::new(FakeTransport::always(Reply::ServerError));
        let identifier = LlmCandidateIdentifier::new(client(transport.clone()));

        let err = identifier.identify("resume").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(transport.calls(), 3);
    }
}
