//! Result ranking
//!
//! Filters raw strategy candidates by minimum score, orders them, and maps
//! them onto the public result shape with snippets attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentId;
use crate::query::ProcessedQuery;
use crate::search::{ScoredDocument, SearchConfig};
use crate::snippet::{Snippet, SnippetExtractor};

/// Metadata carried on each result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A ranked, snippeted search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: DocumentId,
    pub agent: String,
    pub score: f32,
    pub snippets: Vec<Snippet>,
    pub metadata: ResultMetadata,
}

/// Orders candidates and produces the public result shape
pub struct ResultRanker {
    config: SearchConfig,
    snippets: SnippetExtractor,
}

impl ResultRanker {
    pub fn new(config: SearchConfig) -> Self {
        let snippets = SnippetExtractor::new(config.max_snippets);
        Self { config, snippets }
    }

    /// Filter by minimum score, sort descending, truncate, attach snippets.
    pub fn rank(
        &self,
        candidates: Vec<ScoredDocument>,
        query: &ProcessedQuery,
    ) -> Vec<SearchResult> {
        let mut kept: Vec<ScoredDocument> = candidates
            .into_iter()
            .filter(|candidate| candidate.score >= self.config.min_score)
            .collect();

        // sort_by is stable: ties keep retrieval order
        kept.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        kept.truncate(self.config.max_results);

        kept.into_iter()
            .map(|ScoredDocument { document, score }| {
                let snippets = self.snippets.extract(&document.extracted_text, query);
                SearchResult {
                    id: document.id,
                    agent: document.agent,
                    score: score.clamp(0.0, 1.0),
                    snippets,
                    metadata: ResultMetadata {
                        created_at: document.created_at,
                        filename: document.filename,
                        title: document.title,
                    },
                }
            })
            .collect()
    }
}
