//! Report builder: assembles scored candidates into a table and renders it
//! as a downloadable XLSX or CSV file.

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;
use crate::scoring::batch::CandidateScores;
use crate::text::noun_phrase::last_noun_phrase;
use crate::text::truncate_chars;

pub mod writer;

pub const NAME_HEADER: &str = "Candidate Name";
pub const TOTAL_HEADER: &str = "Total Score";
const MAX_LABEL_CHARS: usize = 50;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("label pattern is valid"));

/// How criterion column headers are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Title-cased last noun phrase, e.g. "Python Experience".
    NounPhrase,
    /// Raw text with non-alphanumeric runs replaced by `_`, length-capped.
    Sanitized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "scores.xlsx",
            ReportFormat::Csv => "scores.csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn render(&self, report: &Report) -> Result<Vec<u8>, AppError> {
        match self {
            ReportFormat::Xlsx => writer::write_xlsx(report),
            ReportFormat::Csv => writer::write_csv(report),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(AppError::Validation(format!(
                "Unsupported report format '{other}'. Use 'xlsx' or 'csv'."
            ))),
        }
    }
}

/// One row per candidate: name, per-criterion scores, total.
#[derive(Debug, Clone)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub name: String,
    pub scores: Vec<u8>,
    pub total: u32,
}

impl Report {
    pub fn build(criteria: &[String], candidates: &[CandidateScores], style: LabelStyle) -> Self {
        let mut headers = Vec::with_capacity(criteria.len() + 2);
        headers.push(NAME_HEADER.to_string());
        headers.extend(column_labels(criteria, style));
        headers.push(TOTAL_HEADER.to_string());

        let rows = candidates
            .iter()
            .map(|c| ReportRow {
                name: c.name.clone(),
                scores: c.scores.clone(),
                total: c.total,
            })
            .collect();

        Self { headers, rows }
    }
}

/// One unique label per criterion, in criteria order. Repeated labels get a
/// numeric suffix so no column is lost.
pub fn column_labels(criteria: &[String], style: LabelStyle) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let label = match style {
                LabelStyle::NounPhrase => {
                    last_noun_phrase(criterion).unwrap_or_else(|| criterion.trim().to_string())
                }
                LabelStyle::Sanitized => sanitize_label(criterion, i),
            };

            let count = seen.entry(label.clone()).or_insert(0);
            *count += 1;
            match *count {
                1 => label,
                n => format!("{label} ({n})"),
            }
        })
        .collect()
}

/// Header-safe label: alphanumeric runs joined by `_`, at most 50 chars.
pub fn sanitize_label(criterion: &str, index: usize) -> String {
    let replaced = NON_ALPHANUMERIC.replace_all(criterion, "_");
    let label = truncate_chars(replaced.trim_matches('_'), MAX_LABEL_CHARS).trim_end_matches('_');
    if label.is_empty() {
        format!("criterion_{}", index + 1)
    } else {
        label.to_string()
    }
}
