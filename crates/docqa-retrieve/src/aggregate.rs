use std::cmp::Ordering;

use docqa_core::types::{RetrievalResult, ScoredChunk};

use crate::context::assemble_context;

/// Lexical overlap alone never reports full certainty.
pub const DEFAULT_CONFIDENCE_CAP: f64 = 95.0;

/// Merge per-document rankings into one result of at most `global_top_k`
/// chunks, with the default confidence cap.
pub fn aggregate(per_document: Vec<Vec<ScoredChunk>>, global_top_k: usize) -> RetrievalResult {
    aggregate_capped(per_document, global_top_k, DEFAULT_CONFIDENCE_CAP)
}

/// Concatenate in document order, sort by score (stable), truncate. An empty
/// selection has confidence 0 and an empty context; otherwise confidence is
/// `min(mean_score * 100, cap)`.
pub fn aggregate_capped(per_document: Vec<Vec<ScoredChunk>>, global_top_k: usize, cap: f64) -> RetrievalResult {
    let mut chunks: Vec<ScoredChunk> = per_document.into_iter().flatten().collect();
    chunks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    chunks.truncate(global_top_k);

    if chunks.is_empty() {
        return RetrievalResult::default();
    }
    let mean = chunks.iter().map(|c| c.score).sum::<f64>() / chunks.len() as f64;
    let confidence = (mean * 100.0).min(cap);
    let context = assemble_context(&chunks);
    RetrievalResult { chunks, confidence, context }
}
