//! Document store access
//!
//! The engine reaches persistence through narrow traits so the backing
//! collection can be swapped without touching the pipeline. Stores that
//! carry a native vector index advertise it through [`DocumentStore::vector_index`];
//! everything else gets the brute-force fallback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::document::{Document, DocumentId};
use crate::error::{Result, SearchError};
use crate::search::ScoredDocument;

/// Text-matching predicate interpreted by the store
#[derive(Debug, Clone, Default)]
pub struct TextPredicate {
    /// Full normalized query, matched as a substring of the extracted text
    pub phrase: String,
    /// Keywords matched as whole words
    pub keywords: Vec<String>,
}

impl TextPredicate {
    /// A document matches on the full phrase or on any whole-word keyword.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if !self.phrase.is_empty() && lower.contains(&self.phrase) {
            return true;
        }
        self.keywords.iter().any(|k| contains_word(&lower, k))
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|t| t == word)
}

/// Filter for store lookups
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Optional text predicate
    pub text: Option<TextPredicate>,
    /// Exact producing-agent label
    pub agent: Option<String>,
    /// Inclusive creation-time lower bound
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive creation-time upper bound
    pub created_before: Option<DateTime<Utc>>,
}

impl DocumentFilter {
    /// Check the agent and date constraints only.
    pub fn matches_metadata(&self, doc: &Document) -> bool {
        if let Some(agent) = &self.agent {
            if doc.agent != *agent {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if doc.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if doc.created_at > before {
                return false;
            }
        }
        true
    }

    /// Check all constraints, including the text predicate.
    pub fn matches(&self, doc: &Document) -> bool {
        if !self.matches_metadata(doc) {
            return false;
        }
        match &self.text {
            Some(text) => text.matches(&doc.extracted_text),
            None => true,
        }
    }
}

/// Native approximate top-k capability advertised by some stores
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// One approximate top-k query. `num_candidates` bounds the index scan
    /// breadth, `limit` caps the returned documents. Scores are the index's
    /// native similarity.
    async fn query(
        &self,
        embedding: &[f32],
        filter: &DocumentFilter,
        num_candidates: usize,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>>;
}

/// Filtered access to the shared document collection
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find documents matching `filter`, up to `limit`
    async fn find(&self, filter: &DocumentFilter, limit: usize) -> Result<Vec<Document>>;

    /// Insert a new document record
    async fn insert(&self, document: Document) -> Result<DocumentId>;

    /// Persist an embedding onto an existing document
    async fn update_embedding(&self, id: DocumentId, embedding: Vec<f32>) -> Result<()>;

    /// Native vector index, when the store has one
    fn vector_index(&self) -> Option<&dyn VectorIndex> {
        None
    }
}

/// In-memory document store backed by a concurrent map
///
/// Retrieval order is deterministic (creation time, then id) so repeated
/// queries rank identically.
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<DocumentId, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Get a document by id
    pub fn get(&self, id: DocumentId) -> Option<Document> {
        self.documents.get(&id).map(|e| e.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, filter: &DocumentFilter, limit: usize) -> Result<Vec<Document>> {
        let mut matched: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matched.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        matched.truncate(limit);
        Ok(matched)
    }

    async fn insert(&self, document: Document) -> Result<DocumentId> {
        let id = document.id;
        self.documents.insert(id, document);
        Ok(id)
    }

    async fn update_embedding(&self, id: DocumentId, embedding: Vec<f32>) -> Result<()> {
        match self.documents.get_mut(&id) {
            Some(mut entry) => {
                entry.embedding = Some(embedding);
                Ok(())
            }
            None => Err(SearchError::store(format!("document not found: {id}"))),
        }
    }
}
