//! Query understanding
//!
//! Parses a raw query string into keywords, heuristic entities, and a coarse
//! intent. Entity extraction is a small fixed set of patterns, not full NLP;
//! the first match per pattern wins.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse intent of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryIntent {
    Information,
    HowTo,
    Definition,
    Time,
    Location,
}

/// Entity kinds recognized by the heuristic patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Date,
    Person,
    Organization,
}

/// A typed span extracted from the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
}

/// Normalized form of a raw query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedQuery {
    /// The query as received
    pub original: String,
    /// Lowercased, trimmed query text
    pub normalized: String,
    /// Lowercase alphanumeric tokens longer than two characters
    pub keywords: Vec<String>,
    /// Heuristically extracted entities
    pub entities: Vec<Entity>,
    /// Coarse intent
    pub intent: QueryIntent,
    /// Query embedding, present only on the vector path
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

/// Parses raw query strings
pub struct QueryProcessor {
    date_pattern: Regex,
    person_pattern: Regex,
    organization_pattern: Regex,
}

impl QueryProcessor {
    pub fn new() -> Self {
        Self {
            date_pattern: Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("valid date pattern"),
            person_pattern: Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b")
                .expect("valid person pattern"),
            organization_pattern: Regex::new(
                r"\b[A-Z][A-Za-z]+\s+(?:Inc|Corporation|Corp|Ltd|LLC|Company)\b",
            )
            .expect("valid organization pattern"),
        }
    }

    /// Parse a raw query. The caller is responsible for rejecting empty input.
    pub fn process(&self, raw: &str) -> ProcessedQuery {
        let original = raw.to_string();
        let normalized = raw.trim().to_lowercase();
        let keywords = extract_keywords(&normalized);
        let entities = self.extract_entities(raw);
        let intent = detect_intent(&normalized);

        ProcessedQuery {
            original,
            normalized,
            keywords,
            entities,
            intent,
            embedding: None,
        }
    }

    /// Apply each entity pattern once; the first match per pattern wins.
    fn extract_entities(&self, raw: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        if let Some(m) = self.date_pattern.find(raw) {
            entities.push(Entity {
                text: m.as_str().to_string(),
                kind: EntityKind::Date,
            });
        }
        if let Some(m) = self.person_pattern.find(raw) {
            entities.push(Entity {
                text: m.as_str().to_string(),
                kind: EntityKind::Person,
            });
        }
        if let Some(m) = self.organization_pattern.find(raw) {
            entities.push(Entity {
                text: m.as_str().to_string(),
                kind: EntityKind::Organization,
            });
        }

        entities
    }
}

impl Default for QueryProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip punctuation, split on whitespace, keep tokens longer than two
/// characters. Duplicates are dropped, first occurrence kept.
fn extract_keywords(normalized: &str) -> Vec<String> {
    let stripped: String = normalized
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut seen = HashSet::new();
    stripped
        .split_whitespace()
        .filter(|token| token.len() > 2)
        .filter(|token| seen.insert(token.to_string()))
        .map(String::from)
        .collect()
}

/// Trigger substrings checked in fixed priority order.
fn detect_intent(normalized: &str) -> QueryIntent {
    if normalized.contains("how") {
        QueryIntent::HowTo
    } else if normalized.contains("what") {
        QueryIntent::Definition
    } else if normalized.contains("when") {
        QueryIntent::Time
    } else if normalized.contains("where") {
        QueryIntent::Location
    } else {
        QueryIntent::Information
    }
}
