use thiserror::Error;

/// Structural errors raised by the retrieval engine.
///
/// Empty input is never an error: it degrades to zero vectors, zero scores
/// or an empty result.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Vector length mismatch: {left} vs {right}")]
    VectorLengthMismatch { left: usize, right: usize },

    #[error("Chunk count mismatch: {vectors} vectors for {chunks} chunks")]
    ChunkCountMismatch { vectors: usize, chunks: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
