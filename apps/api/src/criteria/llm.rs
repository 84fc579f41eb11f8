use async_trait::async_trait;
use tracing::{debug, info};

use super::parse::parse_criteria_reply;
use super::prompts::{CRITERIA_PROMPT_TEMPLATE, CRITERIA_SYSTEM};
use super::{CriteriaExtractor, MAX_EXTRACTED_CRITERIA};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::text::truncate_chars;

/// Characters of job description sent to the model.
pub const JD_PROMPT_CHARS: usize = 10_000;
const CRITERIA_MAX_TOKENS: u32 = 1024;

/// Model-backed criteria extractor.
pub struct LlmCriteriaExtractor {
    llm: LlmClient,
}

impl LlmCriteriaExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CriteriaExtractor for LlmCriteriaExtractor {
    async fn extract(&self, jd_text: &str) -> Result<Vec<String>, AppError> {
        let prompt =
            CRITERIA_PROMPT_TEMPLATE.replace("{jd_text}", truncate_chars(jd_text, JD_PROMPT_CHARS));

        let reply = self
            .llm
            .complete(&prompt, CRITERIA_SYSTEM, CRITERIA_MAX_TOKENS)
            .await?;
        debug!("Criteria reply: {} chars", reply.len());

        let criteria = parse_criteria_reply(&reply, MAX_EXTRACTED_CRITERIA);
        info!("LLM extracted {} criteria", criteria.len());
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::{client, FakeTransport, Reply};

    #[tokio::test]
    async fn test_extracts_from_json_reply() {
        let transport = Arc::new(FakeTransport::new(vec![Reply::text(
            r#"{"criteria": ["5+ years of Python", "AWS certification"]}"#,
        )]));
        let extractor = LlmCriteriaExtractor::new(client(transport));

        let criteria = extractor.extract("Job text").await.unwrap();
        assert_eq!(criteria, vec!["5+ years of Python", "AWS certification"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_first_10k_chars_only() {
        let transport = Arc::new(FakeTransport::new(vec![Reply::text("- Rust")]));
        let extractor = LlmCriteriaExtractor::new(client(transport.clone()));

        let jd = format!("{}{}", "a".repeat(JD_PROMPT_CHARS), "TAIL_MARKER");
        extractor.extract(&jd).await.unwrap();

        let prompt = &transport.prompts()[0];
        assert!(prompt.contains(&"a".repeat(JD_PROMPT_CHARS)));
        assert!(!prompt.contains("TAIL_MARKER"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_after_retries() {
        let transport = Arc::new(FakeTransport::always(Reply::ServerError));
        let extractor = LlmCriteriaExtractor::new(client(transport.clone()));

        let err = extractor.extract("Job text").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_client_error_fails_without_retry() {
        let transport = Arc::new(FakeTransport::new(vec![Reply::ClientError]));
        let extractor = LlmCriteriaExtractor::new(client(transport.clone()));

        let err = extractor.extract("Job text").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_criteria_list_is_empty_result() {
        let transport = Arc::new(FakeTransport::new(vec![Reply::text(r#"{"criteria": []}"#)]));
        let extractor = LlmCriteriaExtractor::new(client(transport));

        assert!(extractor.extract("Job text").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_reply_without_string_list_yields_no_criteria() {
        let transport = Arc::new(FakeTransport::new(vec![Reply::text(
            r#"{"criteria": [{"skill": "Python"}, {"skill": "SQL"}]}"#,
        )]));
        let extractor = LlmCriteriaExtractor::new(client(transport));

        assert!(extractor.extract("Job text").await.unwrap().is_empty());
    }
}
