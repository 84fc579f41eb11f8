//! Batch scoring over the resumes of one request.
//!
//! Resumes are processed one at a time, in upload order. A resume that has
//! no extractable text, or whose naming or scoring fails, is logged and
//! skipped. Only a batch where every resume fails is an error.

use tracing::{info, warn};

use super::{CandidateIdentifier, ResumeScorer};
use crate::documents::ExtractedDocument;
use crate::errors::AppError;

/// One successfully scored candidate.
#[derive(Debug, Clone)]
pub struct CandidateScores {
    pub filename: String,
    pub name: String,
    /// One score per criterion, in criteria order.
    pub scores: Vec<u8>,
    pub total: u32,
}

impl CandidateScores {
    pub fn new(filename: String, name: String, scores: Vec<u8>) -> Self {
        let total = scores.iter().map(|&s| s as u32).sum();
        Self {
            filename,
            name,
            scores,
            total,
        }
    }
}

pub async fn score_batch(
    identifier: &dyn CandidateIdentifier,
    scorer: &dyn ResumeScorer,
    criteria: &[String],
    resumes: &[ExtractedDocument],
) -> Result<Vec<CandidateScores>, AppError> {
    let mut results = Vec::with_capacity(resumes.len());

    for resume in resumes {
        match score_one(identifier, scorer, criteria, resume).await {
            Ok(candidate) => {
                info!(
                    "Scored '{}' as '{}': total {}",
                    resume.filename, candidate.name, candidate.total
                );
                results.push(candidate);
            }
            Err(e) => warn!("Skipping resume '{}': {e}", resume.filename),
        }
    }

    if results.is_empty() {
        return Err(AppError::NoValidResumes);
    }
    Ok(results)
}

async fn score_one(
    identifier: &dyn CandidateIdentifier,
    scorer: &dyn ResumeScorer,
    criteria: &[String],
    resume: &ExtractedDocument,
) -> Result<CandidateScores, AppError> {
    if resume.text.trim().is_empty() {
        return Err(AppError::Validation("no extractable text".to_string()));
    }

    let name = identifier.identify(&resume.text).await?;
    let scores = scorer.score(&resume.text, criteria).await?;
    if scores.len() != criteria.len() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "scorer returned {} scores for {} criteria",
            scores.len(),
            criteria.len()
        )));
    }

    Ok(CandidateScores::new(resume.filename.clone(), name, scores))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::{client, FakeTransport, Reply};
    use crate::scoring::{LexicalScorer, LlmCandidateIdentifier, LlmScorer, PersonNameRecognizer};

    fn doc(filename: &str, text: &str) -> ExtractedDocument {
        ExtractedDocument {
            filename: filename.to_string(),
            text: text.to_string(),
        }
    }

    fn criteria() -> Vec<String> {
        vec![
            "Must have 5 years of Python experience.".to_string(),
            "AWS certification required.".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_failed_resume_is_skipped() {
        let resumes = vec![
            doc("a.pdf", "Jane Doe\n5 years experience in Python development"),
            doc("broken.pdf", ""),
            doc("c.docx", "Ravi Kumar\nHolds the AWS certification. Python scripting."),
        ];

        let results = score_batch(&PersonNameRecognizer, &LexicalScorer, &criteria(), &resumes)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Jane Doe");
        assert_eq!(results[1].name, "Ravi Kumar");
        for row in &results {
            assert_eq!(row.scores.len(), 2);
            assert_eq!(row.total, row.scores.iter().map(|&s| s as u32).sum::<u32>());
        }
        assert!(results[0].scores[0] > 0);
    }

    #[tokio::test]
    async fn test_all_failed_is_error() {
        let resumes = vec![doc("a.pdf", "  "), doc("b.pdf", "")];
        let err = score_batch(&PersonNameRecognizer, &LexicalScorer, &criteria(), &resumes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoValidResumes));
    }

    #[tokio::test]
    async fn test_llm_parse_failure_skips_only_that_resume() {
        // resume 1: name + 2 scores, resume 2: name + garbage score
        let transport = Arc::new(FakeTransport::new(vec![
            Reply::text("Jane Doe"),
            Reply::text("4"),
            Reply::text("2"),
            Reply::text("Omar Haddad"),
            Reply::text("definitely a five"),
        ]));
        let llm = client(transport);
        let identifier = LlmCandidateIdentifier::new(llm.clone());
        let scorer = LlmScorer::new(llm);

        let resumes = vec![doc("a.pdf", "resume one"), doc("b.pdf", "resume two")];
        let results = score_batch(&identifier, &scorer, &criteria(), &resumes)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Jane Doe");
        assert_eq!(results[0].scores, vec![4, 2]);
        assert_eq!(results[0].total, 6);
    }

    #[test]
    fn test_total_is_sum_of_scores() {
        let row = CandidateScores::new("a.pdf".into(), "A B".into(), vec![5, 5, 5, 5]);
        assert_eq!(row.total, 20);
    }
}
