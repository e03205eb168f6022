//! Document record types
//!
//! Records are produced by upstream ingestion agents and are immutable from
//! the engine's perspective, except for lazy embedding backfill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for document records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Create a new random DocumentId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Structured analysis attached at ingestion time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Entity strings recognized in the extracted text
    #[serde(default)]
    pub entities: Vec<String>,
    /// Short summary of the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A previously processed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Label of the agent that produced this record
    pub agent: String,
    /// Text extracted from the source file
    pub extracted_text: String,
    /// Analysis metadata from upstream processing
    #[serde(default)]
    pub analysis: DocumentAnalysis,
    /// Record creation time
    pub created_at: DateTime<Utc>,
    /// Source filename, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Display title, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Embedding vector, backfilled lazily by vector search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    pub fn new(agent: impl Into<String>, extracted_text: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            agent: agent.into(),
            extracted_text: extracted_text.into(),
            analysis: DocumentAnalysis::default(),
            created_at: Utc::now(),
            filename: None,
            title: None,
            embedding: None,
        }
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_analysis(mut self, analysis: DocumentAnalysis) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Text used when generating an embedding for this document
    pub fn searchable_text(&self) -> String {
        match &self.title {
            Some(title) => format!("{} {}", title, self.extracted_text),
            None => self.extracted_text.clone(),
        }
    }
}
