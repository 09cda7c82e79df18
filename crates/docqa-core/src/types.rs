//! Domain types shared by the text and retrieval crates.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;
pub type DocumentId = String;

/// A document as seen by the engine: identity plus its ordered chunk texts.
///
/// Vectors are never stored here; they are re-derived from `chunks` on every
/// retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub chunks: Vec<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, chunks: Vec<String>) -> Self {
        Self { id: id.into(), name: name.into(), chunks }
    }

    /// Flatten into one persistable record per chunk.
    pub fn records(&self) -> Vec<DocumentChunk> {
        let total_chunks = self.chunks.len();
        self.chunks
            .iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{}:{}", self.id, chunk_index),
                doc_id: self.id.clone(),
                doc_name: self.name.clone(),
                content: content.clone(),
                chunk_index,
                total_chunks,
            })
            .collect()
    }
}

/// A persisted chunk record, identified by `(doc_id, chunk_index)`.
///
/// - `id`: `"{doc_id}:{chunk_index}"`
/// - `doc_id`/`doc_name`: owning document
/// - `content`: the chunk text
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: DocumentId,
    pub doc_name: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One ranked passage. `score` is a cosine similarity in `[-1, 1]` and
/// `source_index` is the chunk's position within its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub document_id: DocumentId,
    pub document_name: String,
    pub score: f64,
    pub source_index: usize,
}

/// The merged answer to one query.
///
/// `confidence` is a capped percentage; `context` holds the labeled
/// sources ("Source 1: ...") in ranked order, empty when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunks: Vec<ScoredChunk>,
    pub confidence: f64,
    pub context: String,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
