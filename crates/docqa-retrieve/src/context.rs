//! Hand-off payload for an external generation step.
//!
//! The engine only builds the request; it never calls a model or parses the
//! model's answer.

use serde::{Deserialize, Serialize};

use docqa_core::types::{RetrievalResult, ScoredChunk};

pub const ANSWER_INSTRUCTIONS: &str = "Answer the question using only the sources below. \
Cite the source numbers you relied on, e.g. [Source 2]. \
If the sources do not contain the answer, say that no relevant information was found.";

/// Label and join chunks in ranked order: `"Source 1: ..."`, `"Source 2: ..."`.
pub fn assemble_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Source {}: {}", i + 1, c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Where a numbered source came from, so a caller can map cited labels back
/// to documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub label: usize,
    pub document_id: String,
    pub document_name: String,
    pub source_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub question: String,
    pub instructions: String,
    pub context: String,
    pub sources: Vec<SourceRef>,
    pub confidence: f64,
}

impl GenerationRequest {
    pub fn new(question: &str, result: &RetrievalResult) -> Self {
        let sources = result
            .chunks
            .iter()
            .enumerate()
            .map(|(i, c)| SourceRef {
                label: i + 1,
                document_id: c.document_id.clone(),
                document_name: c.document_name.clone(),
                source_index: c.source_index,
            })
            .collect();
        Self {
            question: question.to_string(),
            instructions: ANSWER_INSTRUCTIONS.to_string(),
            context: result.context.clone(),
            sources,
            confidence: result.confidence,
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Single prompt string for text-only generation APIs.
    pub fn prompt(&self) -> String {
        format!("{}\n\nSources:\n{}\n\nQuestion: {}", self.instructions, self.context, self.question)
    }
}
