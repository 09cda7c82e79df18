//! docqa-retrieve
//!
//! Query-time pipeline: re-derive vectors from chunk text, rank each
//! document, merge across documents and build the generation hand-off.

pub mod aggregate;
pub mod context;

use rayon::prelude::*;

use docqa_core::config::{RetrievalConfig, VocabularyScope};
use docqa_core::error::Result;
use docqa_core::traits::Retriever;
use docqa_core::types::{Document, RetrievalResult, ScoredChunk};
use docqa_text::{build_vectors, rank, RankOptions};

pub use aggregate::{aggregate, aggregate_capped, DEFAULT_CONFIDENCE_CAP};
pub use context::{assemble_context, GenerationRequest, SourceRef};

/// Answer `query` from `documents` with the default settings
/// (per-document top 3, global top 5).
pub fn retrieve(query: &str, documents: &[Document]) -> Result<RetrievalResult> {
    retrieve_with(query, documents, &RetrievalConfig::default())
}

pub fn retrieve_with(query: &str, documents: &[Document], config: &RetrievalConfig) -> Result<RetrievalResult> {
    let options = RankOptions { top_k: config.per_doc_top_k, relevance_floor: config.relevance_floor };
    let per_document = match config.vocabulary_scope {
        VocabularyScope::PerDocument => rank_per_document(query, documents, config, options)?,
        VocabularyScope::Corpus => rank_over_corpus(query, documents, config, options)?,
    };
    let result = aggregate_capped(per_document, config.global_top_k, config.confidence_cap);
    tracing::debug!(
        documents = documents.len(),
        hits = result.chunks.len(),
        confidence = result.confidence,
        "retrieval complete"
    );
    Ok(result)
}

/// Each document gets its own vocabulary and IDF; documents are independent
/// so they are scored in parallel.
fn rank_per_document(
    query: &str,
    documents: &[Document],
    config: &RetrievalConfig,
    options: RankOptions,
) -> Result<Vec<Vec<ScoredChunk>>> {
    documents
        .par_iter()
        .map(|doc| {
            let space = build_vectors(&doc.chunks);
            let query_vector = space.vectorize_query(query, config.query_weighting);
            rank(&query_vector, &space.vectors, doc, options)
        })
        .collect()
}

/// One vocabulary over every chunk of every document, so scores from
/// different documents are on the same scale.
fn rank_over_corpus(
    query: &str,
    documents: &[Document],
    config: &RetrievalConfig,
    options: RankOptions,
) -> Result<Vec<Vec<ScoredChunk>>> {
    let all_chunks: Vec<&str> = documents.iter().flat_map(|d| d.chunks.iter().map(String::as_str)).collect();
    let space = build_vectors(&all_chunks);
    let query_vector = space.vectorize_query(query, config.query_weighting);

    let mut offsets = Vec::with_capacity(documents.len());
    let mut start = 0;
    for doc in documents {
        offsets.push(start);
        start += doc.chunks.len();
    }
    documents
        .par_iter()
        .zip(offsets.par_iter())
        .map(|(doc, &offset)| {
            let vectors = &space.vectors[offset..offset + doc.chunks.len()];
            rank(&query_vector, vectors, doc, options)
        })
        .collect()
}

/// [`Retriever`] backed by the lexical pipeline.
#[derive(Debug, Clone, Default)]
pub struct LexicalRetriever {
    config: RetrievalConfig,
}

impl LexicalRetriever {
    pub fn new(config: RetrievalConfig) -> Self { Self { config } }

    pub fn config(&self) -> &RetrievalConfig { &self.config }
}

impl Retriever for LexicalRetriever {
    fn retrieve(&self, query: &str, documents: &[Document]) -> Result<RetrievalResult> {
        retrieve_with(query, documents, &self.config)
    }
}
