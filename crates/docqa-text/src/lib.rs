//! docqa-text
//!
//! Lexical text analysis for retrieval: normalization and stemming
//! (`normalize`), TF-IDF vector spaces and query projection (`vector`), and
//! cosine ranking of one document's chunks (`rank`).

pub mod normalize;
pub mod rank;
pub mod vector;

pub use normalize::{normalize, stem, STOP_WORDS};
pub use rank::{rank, RankOptions};
pub use vector::{build_vectors, cosine_similarity, vectorize_query, Vector, VectorSpace, Vocabulary};
