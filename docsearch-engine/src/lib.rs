//! Hybrid document search engine
//!
//! Ranks previously processed documents against free-text queries using two
//! interchangeable strategies: deterministic keyword/text matching and
//! vector similarity, with graceful fallback to a brute-force cosine scan
//! when the store has no native vector index.
//!
//! ## Features
//!
//! - **Query understanding** - keywords, heuristic entities, coarse intent
//! - **Two search strategies** - weighted text scoring, cosine vector similarity
//! - **Lazy embedding backfill** - compute-if-absent, persisted for reuse
//! - **Sentence snippets** and per-result-set summaries
//!
//! ## Example
//!
//! ```ignore
//! use docsearch_engine::{Document, MemoryStore, SearchConfig, SearchEngine, SearchRequest};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store
//!     .insert(Document::new("document_processor", "Machine learning enables automation"))
//!     .await?;
//!
//! let engine = SearchEngine::new(store, SearchConfig::default());
//! let response = engine.search(SearchRequest::new("machine learning")).await?;
//! println!("{}", response.summary);
//! ```

pub mod document;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod query;
pub mod rank;
pub mod search;
pub mod snippet;
pub mod store;
pub mod summary;

// Re-exports for convenience
pub use document::{Document, DocumentAnalysis, DocumentId};
pub use encoder::{CachingEncoder, TextEncoder};
pub use engine::{DateRange, SearchEngine, SearchFilters, SearchRequest, SearchResponse};
pub use error::{Result, SearchError};
pub use query::{Entity, EntityKind, ProcessedQuery, QueryIntent, QueryProcessor};
pub use rank::{ResultMetadata, ResultRanker, SearchResult};
pub use search::{
    cosine_similarity, ScoredDocument, SearchConfig, SearchType, TextSearchExecutor,
    VectorSearchExecutor,
};
pub use snippet::{Snippet, SnippetExtractor};
pub use store::{DocumentFilter, DocumentStore, MemoryStore, TextPredicate, VectorIndex};
