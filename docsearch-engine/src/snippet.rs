//! Snippet extraction
//!
//! Splits document text on sentence-terminator runs and keeps the sentences
//! most relevant to the query. Sentence scores are additive and not clamped;
//! only the result-level score carries the [0,1] guarantee.

use serde::{Deserialize, Serialize};

use crate::query::ProcessedQuery;

/// Score for a sentence containing the full normalized query
const PHRASE_WEIGHT: f32 = 0.5;
/// Score added per matched keyword
const KEYWORD_WEIGHT: f32 = 0.1;

/// A scored excerpt from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub score: f32,
}

/// Selects the most query-relevant sentences from a document
pub struct SnippetExtractor {
    max_snippets: usize,
}

impl SnippetExtractor {
    pub fn new(max_snippets: usize) -> Self {
        Self { max_snippets }
    }

    /// Top scoring sentences, descending. Documents with no extractable
    /// text yield an empty list.
    pub fn extract(&self, text: &str, query: &ProcessedQuery) -> Vec<Snippet> {
        let mut snippets: Vec<Snippet> = split_sentences(text)
            .into_iter()
            .filter_map(|sentence| {
                let score = score_sentence(&sentence, query);
                (score > 0.0).then_some(Snippet {
                    text: sentence,
                    score,
                })
            })
            .collect();

        snippets.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        snippets.truncate(self.max_snippets);
        snippets
    }
}

/// Split on `.`, `!`, `?` runs, dropping blank fragments.
fn split_sentences(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn score_sentence(sentence: &str, query: &ProcessedQuery) -> f32 {
    let lower = sentence.to_lowercase();
    let mut score = 0.0;

    if !query.normalized.is_empty() && lower.contains(&query.normalized) {
        score += PHRASE_WEIGHT;
    }

    for keyword in &query.keywords {
        if lower.contains(keyword.as_str()) {
            score += KEYWORD_WEIGHT;
        }
    }

    score
}
