//! Deterministic keyword/text matching
//!
//! Retrieval uses the store's text predicate; scoring is a fixed weighted
//! heuristic over phrase presence, keyword overlap, and entity overlap.
//! The weights are kept for behavioral compatibility with the archive
//! pipeline and are not calibrated.

use std::sync::Arc;

use crate::document::Document;
use crate::query::ProcessedQuery;
use crate::search::{ScoredDocument, SearchConfig};
use crate::store::{DocumentFilter, DocumentStore, TextPredicate};

/// Weight of a full-phrase match
const PHRASE_WEIGHT: f32 = 0.5;
/// Maximum contribution of keyword overlap
const KEYWORD_WEIGHT: f32 = 0.3;
/// Maximum contribution of entity overlap
const ENTITY_WEIGHT: f32 = 0.2;

/// Text matching strategy
pub struct TextSearchExecutor {
    store: Arc<dyn DocumentStore>,
    config: SearchConfig,
}

impl TextSearchExecutor {
    pub fn new(store: Arc<dyn DocumentStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Filtered retrieval followed by heuristic scoring. Retrieval order is
    /// not the final ranking.
    pub async fn execute(
        &self,
        query: &ProcessedQuery,
        base_filter: &DocumentFilter,
    ) -> Vec<ScoredDocument> {
        let mut filter = base_filter.clone();
        filter.text = Some(TextPredicate {
            phrase: query.normalized.clone(),
            keywords: query.keywords.clone(),
        });

        let candidates = match self.store.find(&filter, self.config.max_results).await {
            Ok(docs) => docs,
            Err(e) => {
                log::warn!("Text search degraded to empty results: {e}");
                return Vec::new();
            }
        };

        candidates
            .into_iter()
            .map(|document| {
                let score = score_document(&document, query);
                ScoredDocument { document, score }
            })
            .collect()
    }
}

/// Heuristic relevance of a document for a query, capped at 1.0.
pub fn score_document(document: &Document, query: &ProcessedQuery) -> f32 {
    let text = document.extracted_text.to_lowercase();
    let mut score = 0.0;

    if !query.normalized.is_empty() && text.contains(&query.normalized) {
        score += PHRASE_WEIGHT;
    }

    if !query.keywords.is_empty() {
        let matched = query
            .keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count();
        score += KEYWORD_WEIGHT * matched as f32 / query.keywords.len() as f32;
    }

    // Entity overlap only contributes when the query has entities
    if !query.entities.is_empty() {
        let doc_entities: Vec<String> = document
            .analysis
            .entities
            .iter()
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
            .collect();
        let matched = query
            .entities
            .iter()
            .filter(|entity| {
                let needle = entity.text.to_lowercase();
                doc_entities
                    .iter()
                    .any(|de| de.contains(&needle) || needle.contains(de.as_str()))
            })
            .count();
        score += ENTITY_WEIGHT * matched as f32 / query.entities.len() as f32;
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentAnalysis;
    use crate::error::{Result, SearchError};
    use crate::query::QueryProcessor;
    use async_trait::async_trait;

    fn processed(raw: &str) -> ProcessedQuery {
        QueryProcessor::new().process(raw)
    }

    #[test]
    fn test_phrase_and_keyword_overlap() {
        let query = processed("machine learning");
        let doc = Document::new("document_processor", "Machine learning enables automation");

        // 0.5 phrase + 0.3 full keyword overlap
        let score = score_document(&doc, &query);
        assert!((score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unrelated_document_scores_zero() {
        let query = processed("machine learning");
        let doc = Document::new("document_processor", "Recipe for sourdough bread");
        assert_eq!(score_document(&doc, &query), 0.0);
    }

    #[test]
    fn test_partial_keyword_fraction() {
        let query = processed("machine learning automation");
        let doc = Document::new("a", "automation pipelines");

        // 1 of 3 keywords, no phrase match
        let score = score_document(&doc, &query);
        assert!((score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_entity_overlap_contributes() {
        let query = processed("reports from Initech Corp");
        let doc = Document::new("a", "annual reports archive").with_analysis(DocumentAnalysis {
            entities: vec!["Initech Corp".to_string()],
            summary: None,
        });

        let without_entities = Document::new("a", "annual reports archive");
        assert!(score_document(&doc, &query) > score_document(&without_entities, &query));
    }

    #[test]
    fn test_score_capped_at_one() {
        let query = processed("Alice Johnson");
        let doc = Document::new("a", "alice johnson alice johnson").with_analysis(
            DocumentAnalysis {
                entities: vec!["Alice Johnson".to_string()],
                summary: None,
            },
        );

        assert!(score_document(&doc, &query) <= 1.0);
    }

    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn find(&self, _: &DocumentFilter, _: usize) -> Result<Vec<Document>> {
            Err(SearchError::store("connection refused"))
        }

        async fn insert(&self, _: Document) -> Result<crate::document::DocumentId> {
            Err(SearchError::store("connection refused"))
        }

        async fn update_embedding(
            &self,
            _: crate::document::DocumentId,
            _: Vec<f32>,
        ) -> Result<()> {
            Err(SearchError::store("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty() {
        let executor =
            TextSearchExecutor::new(Arc::new(UnreachableStore), SearchConfig::default());
        let candidates = executor
            .execute(&processed("machine learning"), &DocumentFilter::default())
            .await;
        assert!(candidates.is_empty());
    }
}
