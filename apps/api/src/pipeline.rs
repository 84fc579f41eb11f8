use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::{Config, ScorerBackend};
use crate::criteria::{CriteriaExtractor, LlmCriteriaExtractor, TriggerPhraseExtractor};
use crate::llm_client::LlmClient;
use crate::report::LabelStyle;
use crate::scoring::{
    CandidateIdentifier, LexicalScorer, LlmCandidateIdentifier, LlmScorer, PersonNameRecognizer,
    ResumeScorer,
};

/// One implementation of each processing stage, fixed at startup.
#[derive(Clone)]
pub struct Pipeline {
    pub backend: ScorerBackend,
    pub criteria: Arc<dyn CriteriaExtractor>,
    pub identifier: Arc<dyn CandidateIdentifier>,
    pub scorer: Arc<dyn ResumeScorer>,
    pub label_style: LabelStyle,
}

impl Pipeline {
    pub fn lexical() -> Self {
        Self {
            backend: ScorerBackend::Lexical,
            criteria: Arc::new(TriggerPhraseExtractor),
            identifier: Arc::new(PersonNameRecognizer),
            scorer: Arc::new(LexicalScorer),
            label_style: LabelStyle::NounPhrase,
        }
    }

    pub fn llm(llm: LlmClient) -> Self {
        Self {
            backend: ScorerBackend::Llm,
            criteria: Arc::new(LlmCriteriaExtractor::new(llm.clone())),
            identifier: Arc::new(LlmCandidateIdentifier::new(llm.clone())),
            scorer: Arc::new(LlmScorer::new(llm)),
            label_style: LabelStyle::Sanitized,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            ScorerBackend::Lexical => Ok(Self::lexical()),
            ScorerBackend::Llm => {
                let api_key = config
                    .anthropic_api_key
                    .clone()
                    .context("ANTHROPIC_API_KEY is required for the llm backend")?;
                let llm = LlmClient::new(api_key, Duration::from_secs(config.llm_timeout_secs))
                    .context("Failed to build LLM client")?;
                Ok(Self::llm(llm))
            }
        }
    }
}
