use std::cmp::Ordering;

use docqa_core::error::{Error, Result};
use docqa_core::types::{Document, ScoredChunk};

use crate::vector::{cosine_similarity, Vector};

/// Per-document ranking limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub top_k: usize,
    /// Scores at or below this are dropped, even if `top_k` is not reached.
    pub relevance_floor: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self { top_k: 3, relevance_floor: 0.05 }
    }
}

/// Score every chunk of `document` against `query_vector` and keep the best
/// `top_k` above the relevance floor.
///
/// `chunk_vectors[i]` must be the vector of `document.chunks[i]`. Ties keep
/// chunk order.
pub fn rank(
    query_vector: &[f64],
    chunk_vectors: &[Vector],
    document: &Document,
    options: RankOptions,
) -> Result<Vec<ScoredChunk>> {
    if chunk_vectors.len() != document.chunks.len() {
        return Err(Error::ChunkCountMismatch { vectors: chunk_vectors.len(), chunks: document.chunks.len() });
    }
    let mut scored = chunk_vectors
        .iter()
        .enumerate()
        .map(|(i, v)| cosine_similarity(query_vector, v).map(|s| (i, s)))
        .collect::<Result<Vec<(usize, f64)>>>()?;
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let ranked: Vec<ScoredChunk> = scored
        .into_iter()
        .filter(|&(_, score)| score > options.relevance_floor)
        .take(options.top_k)
        .map(|(i, score)| ScoredChunk {
            text: document.chunks[i].clone(),
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            score,
            source_index: i,
        })
        .collect();
    tracing::trace!(doc = %document.id, chunks = document.chunks.len(), kept = ranked.len(), "ranked document");
    Ok(ranked)
}
