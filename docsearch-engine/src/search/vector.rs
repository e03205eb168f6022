//! Vector similarity search
//!
//! Two implementations behind one contract: a delegated query against the
//! store's native vector index, and a brute-force cosine scan with lazy
//! embedding backfill when no index is available. Both yield scores the
//! ranker treats uniformly; whether the two distributions are truly
//! comparable is an open compatibility risk.

use std::sync::Arc;

use futures::future::join_all;

use crate::document::Document;
use crate::encoder::TextEncoder;
use crate::query::ProcessedQuery;
use crate::search::{ScoredDocument, SearchConfig};
use crate::store::{DocumentFilter, DocumentStore, VectorIndex};

/// Index scan breadth per returned result on the delegated path
const NUM_CANDIDATES_FACTOR: usize = 10;

/// Vector similarity strategy
pub struct VectorSearchExecutor {
    store: Arc<dyn DocumentStore>,
    encoder: Arc<dyn TextEncoder>,
    config: SearchConfig,
}

impl VectorSearchExecutor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        encoder: Arc<dyn TextEncoder>,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            encoder,
            config,
        }
    }

    /// Probe the store for a native index once, then run the matching
    /// implementation.
    pub async fn execute(
        &self,
        query: &ProcessedQuery,
        base_filter: &DocumentFilter,
    ) -> Vec<ScoredDocument> {
        let embedding = match &query.embedding {
            Some(v) => v.as_slice(),
            None => {
                log::warn!("Vector search invoked without a query embedding");
                return Vec::new();
            }
        };

        match self.store.vector_index() {
            Some(index) => self.delegated(index, embedding, base_filter).await,
            None => self.brute_force(embedding, base_filter).await,
        }
    }

    /// One approximate top-k query against the native index. The index's
    /// similarity score is used as-is.
    async fn delegated(
        &self,
        index: &dyn VectorIndex,
        embedding: &[f32],
        base_filter: &DocumentFilter,
    ) -> Vec<ScoredDocument> {
        let num_candidates = self.config.max_results * NUM_CANDIDATES_FACTOR;
        match index
            .query(embedding, base_filter, num_candidates, self.config.max_results)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                log::warn!("Native index query failed, returning empty results: {e}");
                Vec::new()
            }
        }
    }

    /// Cosine scan over a bounded candidate set, backfilling missing
    /// embeddings along the way.
    async fn brute_force(
        &self,
        embedding: &[f32],
        base_filter: &DocumentFilter,
    ) -> Vec<ScoredDocument> {
        let candidates = match self.store.find(base_filter, self.config.scan_limit).await {
            Ok(docs) => docs,
            Err(e) => {
                log::warn!("Vector search degraded to empty results: {e}");
                return Vec::new();
            }
        };

        let backfilled = join_all(
            candidates
                .into_iter()
                .map(|document| self.ensure_embedding(document)),
        )
        .await;

        let mut scored: Vec<ScoredDocument> = backfilled
            .into_iter()
            .flatten()
            .filter_map(|document| {
                let score = match document.embedding.as_deref() {
                    Some(v) => cosine_similarity(embedding, v),
                    None => return None,
                };
                if score >= self.config.min_score {
                    Some(ScoredDocument { document, score })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.config.max_results);
        scored
    }

    /// Compute-if-absent embedding backfill. Returns `None` when encoding
    /// fails, excluding the document from scoring.
    async fn ensure_embedding(&self, mut document: Document) -> Option<Document> {
        if document.embedding.is_some() {
            return Some(document);
        }

        let text = document.searchable_text();
        let embedding = match self.encoder.encode(&text).await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Skipping document {}: embedding failed: {e}", document.id);
                return None;
            }
        };

        if let Err(e) = self
            .store
            .update_embedding(document.id, embedding.clone())
            .await
        {
            log::warn!("Could not persist embedding for {}: {e}", document.id);
        }

        document.embedding = Some(embedding);
        Some(document)
    }
}

/// Cosine similarity between two vectors, 0.0 when either has zero magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SearchError};
    use crate::query::QueryProcessor;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let a = vec![0.3, 0.9, 0.2];
        let b = vec![0.7, 0.1, 0.5];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    struct StubEncoder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl TextEncoder for StubEncoder {
        async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    struct FailingEncoder;

    #[async_trait]
    impl TextEncoder for FailingEncoder {
        async fn encode(&self, text: &str) -> Result<Vec<f32>> {
            Err(SearchError::encoding(format!("cannot encode: {text}")))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn query_with_embedding(raw: &str, embedding: Vec<f32>) -> ProcessedQuery {
        let mut query = QueryProcessor::new().process(raw);
        query.embedding = Some(embedding);
        query
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                Document::new("a", "close match")
                    .with_embedding(vec![1.0, 0.0, 0.0]),
            )
            .await
            .unwrap();
        store
            .insert(
                Document::new("a", "partial match")
                    .with_embedding(vec![1.0, 1.0, 0.0]),
            )
            .await
            .unwrap();
        store
            .insert(
                Document::new("a", "orthogonal")
                    .with_embedding(vec![0.0, 0.0, 1.0]),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_brute_force_min_score_and_ordering() {
        let store = seeded_store().await;
        let config = SearchConfig {
            min_score: 0.5,
            ..Default::default()
        };
        let executor = VectorSearchExecutor::new(
            store,
            Arc::new(StubEncoder {
                vector: vec![1.0, 0.0, 0.0],
            }),
            config,
        );

        let query = query_with_embedding("similar documents", vec![1.0, 0.0, 0.0]);
        let results = executor.execute(&query, &DocumentFilter::default()).await;

        // cos = 1.0 and ~0.707 survive the 0.5 floor, the orthogonal doc does not
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.extracted_text, "close match");
        assert_eq!(results[1].document.extracted_text, "partial match");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_brute_force_backfills_missing_embeddings() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .insert(Document::new("a", "no embedding yet"))
            .await
            .unwrap();

        let executor = VectorSearchExecutor::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(StubEncoder {
                vector: vec![0.6, 0.8],
            }),
            SearchConfig::default(),
        );

        let query = query_with_embedding("anything", vec![0.6, 0.8]);
        let results = executor.execute(&query, &DocumentFilter::default()).await;

        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
        // The computed embedding is persisted back onto the document
        assert_eq!(store.get(id).unwrap().embedding, Some(vec![0.6, 0.8]));
    }

    #[tokio::test]
    async fn test_backfill_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .insert(
                Document::new("a", "already embedded")
                    .with_embedding(vec![0.0, 1.0]),
            )
            .await
            .unwrap();

        // Encoder would produce a different vector; it must not be called
        let executor = VectorSearchExecutor::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(StubEncoder {
                vector: vec![1.0, 0.0],
            }),
            SearchConfig::default(),
        );

        let query = query_with_embedding("anything", vec![0.0, 1.0]);
        executor.execute(&query, &DocumentFilter::default()).await;

        assert_eq!(store.get(id).unwrap().embedding, Some(vec![0.0, 1.0]));
    }

    #[tokio::test]
    async fn test_encode_failure_excludes_document_only() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                Document::new("a", "good doc")
                    .with_embedding(vec![1.0, 0.0, 0.0]),
            )
            .await
            .unwrap();
        store
            .insert(Document::new("a", "cannot be embedded"))
            .await
            .unwrap();

        let executor = VectorSearchExecutor::new(
            store,
            Arc::new(FailingEncoder),
            SearchConfig::default(),
        );

        let query = query_with_embedding("anything", vec![1.0, 0.0, 0.0]);
        let results = executor.execute(&query, &DocumentFilter::default()).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.extracted_text, "good doc");
    }

    struct CannedIndex {
        results: Vec<ScoredDocument>,
        seen: std::sync::Mutex<Option<(usize, usize)>>,
    }

    #[async_trait]
    impl VectorIndex for CannedIndex {
        async fn query(
            &self,
            _embedding: &[f32],
            _filter: &DocumentFilter,
            num_candidates: usize,
            limit: usize,
        ) -> Result<Vec<ScoredDocument>> {
            *self.seen.lock().unwrap() = Some((num_candidates, limit));
            Ok(self.results.clone())
        }
    }

    struct IndexedStore {
        inner: MemoryStore,
        index: CannedIndex,
    }

    #[async_trait]
    impl DocumentStore for IndexedStore {
        async fn find(&self, filter: &DocumentFilter, limit: usize) -> Result<Vec<Document>> {
            self.inner.find(filter, limit).await
        }

        async fn insert(&self, document: Document) -> Result<crate::document::DocumentId> {
            self.inner.insert(document).await
        }

        async fn update_embedding(
            &self,
            id: crate::document::DocumentId,
            embedding: Vec<f32>,
        ) -> Result<()> {
            self.inner.update_embedding(id, embedding).await
        }

        fn vector_index(&self) -> Option<&dyn VectorIndex> {
            Some(&self.index)
        }
    }

    #[tokio::test]
    async fn test_delegated_index_used_when_advertised() {
        let doc = Document::new("a", "indexed doc");
        let store = Arc::new(IndexedStore {
            inner: MemoryStore::new(),
            index: CannedIndex {
                results: vec![ScoredDocument {
                    document: doc,
                    score: 0.91,
                }],
                seen: std::sync::Mutex::new(None),
            },
        });

        let config = SearchConfig {
            max_results: 5,
            ..Default::default()
        };
        let executor = VectorSearchExecutor::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::new(StubEncoder {
                vector: vec![1.0, 0.0],
            }),
            config,
        );

        let query = query_with_embedding("anything", vec![1.0, 0.0]);
        let results = executor.execute(&query, &DocumentFilter::default()).await;

        // The native score passes through untouched
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.91);
        // num_candidates = max_results x 10
        assert_eq!(*store.index.seen.lock().unwrap(), Some((50, 5)));
    }

    #[tokio::test]
    async fn test_missing_query_embedding_yields_empty() {
        let store = seeded_store().await;
        let executor = VectorSearchExecutor::new(
            store,
            Arc::new(StubEncoder {
                vector: vec![1.0, 0.0, 0.0],
            }),
            SearchConfig::default(),
        );

        let query = QueryProcessor::new().process("no embedding attached");
        let results = executor.execute(&query, &DocumentFilter::default()).await;
        assert!(results.is_empty());
    }
}
