//! Search pipeline orchestration
//!
//! Each request runs a single-pass, stateless pipeline over a snapshot of
//! the store: query processing, strategy selection, retrieval and scoring,
//! ranking, snippet extraction, summary. Only invalid input and a missing
//! encoder surface as errors; everything else degrades to empty or partial
//! results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoder::TextEncoder;
use crate::error::{Result, SearchError};
use crate::query::{ProcessedQuery, QueryProcessor};
use crate::rank::{ResultRanker, SearchResult};
use crate::search::{
    SearchConfig, SearchStrategy, SearchType, TextSearchExecutor, VectorSearchExecutor,
};
use crate::store::{DocumentFilter, DocumentStore};
use crate::summary;

/// Inclusive date bounds for a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// Optional request filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// A search request from the dispatch layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub use_vector_search: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: None,
            use_vector_search: false,
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_vector_search(mut self) -> Self {
        self.use_vector_search = true;
        self
    }
}

/// Response returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub processed_query: ProcessedQuery,
    pub results: Vec<SearchResult>,
    pub summary: String,
    pub total_results: usize,
    pub search_type: SearchType,
}

/// Hybrid search engine over a processed-document store
///
/// Store and encoder handles are injected at construction; the engine
/// holds no other state across requests.
pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    encoder: Option<Arc<dyn TextEncoder>>,
    processor: QueryProcessor,
    ranker: ResultRanker,
    config: SearchConfig,
}

impl SearchEngine {
    /// Create a text-only engine over the given store.
    pub fn new(store: Arc<dyn DocumentStore>, config: SearchConfig) -> Self {
        Self {
            store,
            encoder: None,
            processor: QueryProcessor::new(),
            ranker: ResultRanker::new(config.clone()),
            config,
        }
    }

    /// Attach a text encoder, enabling the vector strategy.
    pub fn with_encoder(mut self, encoder: Arc<dyn TextEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Run one request through the full pipeline.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        let raw = request.query.trim();
        if raw.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let mut processed = self.processor.process(raw);
        let base_filter = base_filter(request.filters.as_ref());
        let strategy = self.select_strategy(&request, &mut processed).await?;

        let candidates = strategy.execute(&processed, &base_filter).await;
        log::debug!(
            "Query {:?} produced {} candidates via {:?}",
            processed.normalized,
            candidates.len(),
            strategy.search_type()
        );

        let results = self.ranker.rank(candidates, &processed);
        let summary = summary::generate(&processed.original, &results);

        Ok(SearchResponse {
            query: processed.original.clone(),
            total_results: results.len(),
            search_type: strategy.search_type(),
            processed_query: processed,
            results,
            summary,
        })
    }

    /// Pick the strategy for this request. The vector path requires an
    /// encoder and attaches the query embedding.
    async fn select_strategy(
        &self,
        request: &SearchRequest,
        processed: &mut ProcessedQuery,
    ) -> Result<SearchStrategy> {
        if !request.use_vector_search {
            return Ok(SearchStrategy::Text(TextSearchExecutor::new(
                Arc::clone(&self.store),
                self.config.clone(),
            )));
        }

        let encoder = self
            .encoder
            .clone()
            .ok_or(SearchError::EncoderUnavailable)?;

        match encoder.encode(&processed.normalized).await {
            Ok(embedding) => processed.embedding = Some(embedding),
            Err(e) => {
                log::warn!("Query embedding failed, vector search will return no results: {e}");
            }
        }

        Ok(SearchStrategy::Vector(VectorSearchExecutor::new(
            Arc::clone(&self.store),
            encoder,
            self.config.clone(),
        )))
    }
}

fn base_filter(filters: Option<&SearchFilters>) -> DocumentFilter {
    let mut filter = DocumentFilter::default();
    if let Some(f) = filters {
        filter.agent = f.agent.clone();
        if let Some(range) = &f.date_range {
            filter.created_after = range.start;
            filter.created_before = range.end;
        }
    }
    filter
}
