//! Search strategies
//!
//! Two interchangeable strategies behind one contract: deterministic
//! keyword/text matching and vector similarity. The strategy is selected
//! once per request; both produce the same scored-candidate shape.

mod text;
mod vector;

pub use text::TextSearchExecutor;
pub use vector::{cosine_similarity, VectorSearchExecutor};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::query::ProcessedQuery;
use crate::store::DocumentFilter;

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum results returned to the caller
    pub max_results: usize,
    /// Minimum score for a candidate to appear in results
    pub min_score: f32,
    /// Candidate cap for the brute-force vector scan
    pub scan_limit: usize,
    /// Snippets attached per result
    pub max_snippets: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_score: 0.1,
            scan_limit: 1000,
            max_snippets: 3,
        }
    }
}

/// A candidate document with its raw strategy score
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Which strategy served a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Text,
    Vector,
}

/// Strategy selected for a single request
pub enum SearchStrategy {
    Text(TextSearchExecutor),
    Vector(VectorSearchExecutor),
}

impl SearchStrategy {
    pub fn search_type(&self) -> SearchType {
        match self {
            Self::Text(_) => SearchType::Text,
            Self::Vector(_) => SearchType::Vector,
        }
    }

    /// Run the selected strategy. Failures inside a strategy degrade to an
    /// empty candidate set rather than erroring the request.
    pub async fn execute(
        &self,
        query: &ProcessedQuery,
        base_filter: &DocumentFilter,
    ) -> Vec<ScoredDocument> {
        match self {
            Self::Text(executor) => executor.execute(query, base_filter).await,
            Self::Vector(executor) => executor.execute(query, base_filter).await,
        }
    }
}
