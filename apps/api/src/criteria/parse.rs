//! Parsing of model replies into criteria lists.
//!
//! Replies are run through an ordered chain of strategies. Each strategy
//! either produces a list or declines; the last one (line splitting) never
//! declines, so the chain always yields a result. The JSON strategies only
//! decline when the reply is not JSON: a valid document with no string list
//! ends the chain with an empty list.

use serde_json::{Map, Value};
use tracing::debug;

use crate::llm_client::strip_json_fences;

/// Object keys checked, in order, before falling back to the first
/// list-of-strings value.
const PREFERRED_KEYS: &[&str] = &["criteria", "requirements", "key_skills", "qualifications"];

const BULLET_CHARS: &[char] = &['-', '*', '•', '·', '‣', '–'];

pub trait CriteriaParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, reply: &str) -> Option<Vec<String>>;
}

/// The whole reply (minus code fences) is a JSON document.
pub struct WholeJson;

/// A JSON object or array is embedded in surrounding prose.
pub struct EmbeddedJson;

/// Every non-blank line, stripped of bullet markers, is one criterion.
pub struct LineFallback;

impl CriteriaParseStrategy for WholeJson {
    fn name(&self) -> &'static str {
        "whole_json"
    }

    fn parse(&self, reply: &str) -> Option<Vec<String>> {
        let value: Value = serde_json::from_str(strip_json_fences(reply)).ok()?;
        Some(criteria_from_value(&value))
    }
}

impl CriteriaParseStrategy for EmbeddedJson {
    fn name(&self) -> &'static str {
        "embedded_json"
    }

    fn parse(&self, reply: &str) -> Option<Vec<String>> {
        [('{', '}'), ('[', ']')].into_iter().find_map(|(open, close)| {
            let start = reply.find(open)?;
            let end = reply.rfind(close)?;
            if end <= start {
                return None;
            }
            let value: Value = serde_json::from_str(&reply[start..=end]).ok()?;
            Some(criteria_from_value(&value))
        })
    }
}

impl CriteriaParseStrategy for LineFallback {
    fn name(&self) -> &'static str {
        "line_fallback"
    }

    fn parse(&self, reply: &str) -> Option<Vec<String>> {
        Some(
            reply
                .lines()
                .map(|line| line.trim().trim_start_matches(BULLET_CHARS).trim())
                .filter(|line| !line.is_empty() && !line.starts_with("```"))
                .map(str::to_string)
                .collect(),
        )
    }
}

/// The default strategy chain, in the order they are tried.
pub fn default_chain() -> Vec<Box<dyn CriteriaParseStrategy>> {
    vec![Box::new(WholeJson), Box::new(EmbeddedJson), Box::new(LineFallback)]
}

/// Parses a model reply into criteria: blank entries dropped, at most
/// `max` kept.
pub fn parse_criteria_reply(reply: &str, max: usize) -> Vec<String> {
    parse_with(&default_chain(), reply, max)
}

pub fn parse_with(
    chain: &[Box<dyn CriteriaParseStrategy>],
    reply: &str,
    max: usize,
) -> Vec<String> {
    let parsed = chain.iter().find_map(|strategy| {
        let result = strategy.parse(reply)?;
        debug!("Criteria reply parsed by {} strategy", strategy.name());
        Some(result)
    });

    parsed
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .take(max)
        .collect()
}

/// Criteria found in a parsed document, or an empty list when it holds no
/// list of strings.
fn criteria_from_value(value: &Value) -> Vec<String> {
    let found = match value {
        Value::Array(items) => string_list(items),
        Value::Object(map) => criteria_from_object(map),
        _ => None,
    };
    if found.is_none() {
        debug!("Reply is JSON but holds no list of strings");
    }
    found.unwrap_or_default()
}

fn criteria_from_object(map: &Map<String, Value>) -> Option<Vec<String>> {
    PREFERRED_KEYS
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(Value::Array(items)) => string_list(items),
            _ => None,
        })
        .or_else(|| {
            map.values().find_map(|v| match v {
                Value::Array(items) => string_list(items),
                _ => None,
            })
        })
}

/// `Some` only when every item is a string. An empty array counts.
fn string_list(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(reply: &str) -> Vec<String> {
        parse_criteria_reply(reply, 15)
    }

    #[test]
    fn test_criteria_key() {
        assert_eq!(parse(r#"{"criteria": ["A", "B"]}"#), vec!["A", "B"]);
    }

    #[test]
    fn test_requirements_key() {
        assert_eq!(parse(r#"{"requirements": ["A"]}"#), vec!["A"]);
    }

    #[test]
    fn test_preferred_key_wins_over_earlier_list() {
        let reply = r#"{"notes": ["ignored"], "key_skills": ["Rust", "SQL"]}"#;
        assert_eq!(parse(reply), vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_first_string_list_when_no_known_key() {
        let reply = r#"{"count": 2, "mixed": [1, "x"], "items": ["Go", "Kafka"]}"#;
        assert_eq!(parse(reply), vec!["Go", "Kafka"]);
    }

    #[test]
    fn test_top_level_array() {
        assert_eq!(parse(r#"["Docker", "AWS"]"#), vec!["Docker", "AWS"]);
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n{\"criteria\": [\"PMP certification\"]}\n```";
        assert_eq!(parse(reply), vec!["PMP certification"]);
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let reply = "Sure! Here are the criteria:\n{\"criteria\": [\"5+ years Java\"]}\nLet me know.";
        assert_eq!(parse(reply), vec!["5+ years Java"]);
    }

    #[test]
    fn test_malformed_falls_back_to_lines() {
        assert_eq!(parse("- A\n- B\n"), vec!["A", "B"]);
        assert_eq!(parse("• Python\n\n* SQL\n·  Linux"), vec!["Python", "SQL", "Linux"]);
    }

    #[test]
    fn test_json_without_string_list_is_empty() {
        assert!(parse(r#"{"score": 3}"#).is_empty());
        assert!(parse(r#"{"criteria": [{"skill": "Python"}, {"skill": "SQL"}]}"#).is_empty());
        assert!(parse(r#"[1, 2, 3]"#).is_empty());
    }

    #[test]
    fn test_embedded_json_without_string_list_is_empty() {
        let reply = "Here you go: {\"criteria\": [{\"skill\": \"Python\"}]} Thanks.";
        assert!(parse(reply).is_empty());
    }

    #[test]
    fn test_empty_list_is_empty() {
        assert!(parse(r#"{"criteria": []}"#).is_empty());
    }

    #[test]
    fn test_blank_entries_dropped_and_truncated() {
        let items: Vec<String> = (0..20).map(|i| format!("\"c{i}\"")).collect();
        let reply = format!("{{\"criteria\": [\"  \", {}]}}", items.join(","));
        let criteria = parse_criteria_reply(&reply, 15);
        assert_eq!(criteria.len(), 15);
        assert_eq!(criteria[0], "c0");
    }

    #[test]
    fn test_chain_order_is_whole_embedded_lines() {
        let names: Vec<_> = default_chain().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["whole_json", "embedded_json", "line_fallback"]);
    }
}
