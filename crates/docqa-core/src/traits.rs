use crate::types::{Document, RetrievalResult};

/// Anything that can answer a query against a set of documents with ranked
/// passages. Implementations must be pure functions of their inputs.
pub trait Retriever: Send + Sync {
    fn retrieve(&self, query: &str, documents: &[Document]) -> crate::error::Result<RetrievalResult>;
}
