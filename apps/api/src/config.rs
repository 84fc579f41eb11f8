use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::report::ReportFormat;

/// Which scoring stack the process runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Lexical,
    Llm,
}

impl ScorerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerBackend::Lexical => "lexical",
            ScorerBackend::Llm => "llm",
        }
    }
}

impl FromStr for ScorerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "keyword" => Ok(ScorerBackend::Lexical),
            "llm" => Ok(ScorerBackend::Llm),
            other => bail!("SCORER_BACKEND must be 'lexical' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub backend: ScorerBackend,
    /// Only required when `backend` is `Llm`.
    pub anthropic_api_key: Option<String>,
    pub report_format: ReportFormat,
    pub max_resumes: usize,
    pub max_criteria: usize,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
    pub criteria_store_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: ScorerBackend = lookup("SCORER_BACKEND")
            .unwrap_or_else(|| "lexical".to_string())
            .parse()?;

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if backend == ScorerBackend::Llm && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set (SCORER_BACKEND=llm)");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            backend,
            anthropic_api_key,
            report_format: lookup("REPORT_FORMAT")
                .unwrap_or_else(|| "xlsx".to_string())
                .parse::<ReportFormat>()
                .context("REPORT_FORMAT must be 'xlsx' or 'csv'")?,
            max_resumes: parse_or(&lookup, "MAX_RESUMES", 20)?,
            max_criteria: parse_or(&lookup, "MAX_CRITERIA", 15)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 15)?,
            criteria_store_capacity: parse_or(&lookup, "CRITERIA_STORE_CAPACITY", 32)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, ScorerBackend::Lexical);
        assert_eq!(config.report_format, ReportFormat::Xlsx);
        assert_eq!(config.max_resumes, 20);
        assert_eq!(config.max_criteria, 15);
        assert_eq!(config.llm_timeout_secs, 15);
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_llm_backend_requires_api_key() {
        let err = config_from(&[("SCORER_BACKEND", "llm")]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config =
            config_from(&[("SCORER_BACKEND", "LLM"), ("ANTHROPIC_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.backend, ScorerBackend::Llm);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(config_from(&[("SCORER_BACKEND", "magic")]).is_err());
    }

    #[test]
    fn test_csv_report_format() {
        let config = config_from(&[("REPORT_FORMAT", "csv")]).unwrap();
        assert_eq!(config.report_format, ReportFormat::Csv);
    }
}
