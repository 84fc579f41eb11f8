//! Candidate naming without a model.
//!
//! `PersonNameRecognizer` is a shallow person-name recognizer: the first run
//! of 2–4 capitalized, name-shaped words on a line that contains no word
//! known to appear in headings, titles, places or organizations. When no run
//! qualifies, the first non-blank line stands in for the name.
//!
//! `validate_candidate_name` guards the model backend: only a strict
//! "First Last" shaped reply is accepted.

use std::collections::HashSet;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::CandidateIdentifier;
use crate::errors::AppError;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

const MIN_NAME_WORDS: usize = 2;
const MAX_NAME_WORDS: usize = 4;

static NAME_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:['\-][A-Z]?[a-z]+)?$").expect("name word pattern is valid")
});

static INITIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\.?$").expect("initial pattern is valid"));

static VALID_CANDIDATE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-zA-Z'\-]*(?: [A-Z][a-zA-Z'\-]*)+$")
        .expect("candidate name pattern is valid")
});

static NON_NAME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // resume headings
        "resume", "curriculum", "vitae", "cv", "profile", "summary", "objective", "experience",
        "education", "skills", "projects", "contact", "references", "certifications",
        "professional", "employment", "history", "technical", "personal", "languages",
        "interests", "achievements", "awards", "publications", "work", "about",
        // titles and roles
        "senior", "junior", "lead", "principal", "staff", "software", "engineer", "engineering",
        "developer", "development", "manager", "management", "analyst", "consultant",
        "designer", "architect", "scientist", "intern", "director", "specialist",
        "administrator", "officer", "head", "data", "product", "project", "full", "stack",
        "backend", "frontend", "web", "mobile", "cloud", "devops", "team",
        // organizations
        "university", "college", "institute", "school", "academy", "company", "inc", "ltd",
        "llc", "corp", "corporation", "technologies", "solutions", "group", "bank",
        // places
        "street", "avenue", "road", "city", "new", "york", "san", "francisco", "los", "angeles",
        "united", "states", "kingdom", "london", "remote",
        // dates
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
        "sep", "sept", "oct", "nov", "dec", "present", "current",
        // degrees and fields
        "bachelor", "master", "science", "arts", "computer", "degree",
        // contact labels and technologies
        "phone", "email", "address", "linkedin", "github", "python", "java", "javascript",
        "rust", "linux", "google", "microsoft", "amazon", "dear", "hiring",
    ]
    .into_iter()
    .collect()
});

/// Heuristic person-name recognizer with first-line fallback.
pub struct PersonNameRecognizer;

#[async_trait]
impl CandidateIdentifier for PersonNameRecognizer {
    async fn identify(&self, resume_text: &str) -> Result<String, AppError> {
        Ok(extract_name(resume_text))
    }
}

/// First recognized person name, else the first non-blank line, else
/// `"Unknown"`.
pub fn extract_name(text: &str) -> String {
    if let Some(name) = text.lines().find_map(find_person_name) {
        return name;
    }
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Scans one line for a run of name-shaped words.
fn find_person_name(line: &str) -> Option<String> {
    let mut run: Vec<&str> = Vec::new();

    for raw in line.split_whitespace() {
        let word = raw.trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '|'));
        let closes_run = word.len() != raw.len();

        if is_name_word(word) || (!run.is_empty() && INITIAL.is_match(word)) {
            run.push(word);
        } else if let Some(name) = accept_run(&mut run) {
            return Some(name);
        }

        if closes_run {
            if let Some(name) = accept_run(&mut run) {
                return Some(name);
            }
        }
    }
    accept_run(&mut run)
}

fn is_name_word(word: &str) -> bool {
    NAME_WORD.is_match(word) && !NON_NAME_WORDS.contains(word.to_lowercase().as_str())
}

/// Drains the current run and returns it when it looks like a full name.
fn accept_run(run: &mut Vec<&str>) -> Option<String> {
    while run.last().is_some_and(|w| INITIAL.is_match(w)) {
        run.pop();
    }
    let words = run.iter().filter(|w| !INITIAL.is_match(w)).count();
    let name = run.join(" ");
    run.clear();

    (MIN_NAME_WORDS..=MAX_NAME_WORDS)
        .contains(&words)
        .then_some(name)
}

/// Returns the model's reply if it is a well-formed "First Last" name,
/// otherwise `"Unknown Candidate"`. Surrounding whitespace and one matching
/// pair of double quotes are stripped first; everything left must match the
/// pattern exactly.
pub fn validate_candidate_name(reply: &str) -> String {
    let trimmed = reply.trim();
    let candidate = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if VALID_CANDIDATE_NAME.is_match(candidate) {
        candidate.to_string()
    } else {
        UNKNOWN_CANDIDATE.to_string()
    }
}
