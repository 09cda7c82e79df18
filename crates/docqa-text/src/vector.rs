//! TF-IDF vector spaces over chunk text.
//!
//! A [`VectorSpace`] is rebuilt from chunk text on every call; nothing here
//! is cached or persisted. Index `i` of every vector built against a
//! [`Vocabulary`] denotes `vocabulary.terms()[i]`.

use std::collections::HashMap;

use docqa_core::config::QueryWeighting;
use docqa_core::error::{Error, Result};

use crate::normalize::normalize;

pub type Vector = Vec<f64>;

/// Distinct terms in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    /// Insert `term` if unseen and return its dimension.
    pub fn insert(&mut self, term: &str) -> usize {
        if let Some(&i) = self.index.get(term) {
            return i;
        }
        let i = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), i);
        i
    }

    pub fn position(&self, term: &str) -> Option<usize> { self.index.get(term).copied() }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

/// Vocabulary, one TF-IDF vector per chunk (in chunk order) and the IDF of
/// each vocabulary term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorSpace {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<Vector>,
    pub idf: Vec<f64>,
}

impl VectorSpace {
    /// Project `query` into this space.
    pub fn vectorize_query(&self, query: &str, weighting: QueryWeighting) -> Vector {
        let mut vector = vectorize_query(query, &self.vocabulary);
        if weighting == QueryWeighting::TfIdf {
            for (w, idf) in vector.iter_mut().zip(&self.idf) {
                *w *= idf;
            }
        }
        vector
    }
}

/// Build a vocabulary and TF-IDF vectors for one corpus of chunks.
///
/// `tf = count / tokens_in_chunk` (0 for a chunk with no tokens),
/// `idf = ln(chunks / max(df, 1))`. A single-chunk corpus therefore has
/// all-zero vectors.
pub fn build_vectors<S: AsRef<str>>(chunks: &[S]) -> VectorSpace {
    let tokenized: Vec<Vec<String>> = chunks.iter().map(|c| normalize(c.as_ref())).collect();

    let mut vocabulary = Vocabulary::new();
    let mut doc_freq: Vec<usize> = Vec::new();
    let mut chunk_counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(tokenized.len());
    for tokens in &tokenized {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            let i = vocabulary.insert(token);
            if i == doc_freq.len() {
                doc_freq.push(0);
            }
            *counts.entry(i).or_insert(0) += 1;
        }
        for &i in counts.keys() {
            doc_freq[i] += 1;
        }
        chunk_counts.push(counts);
    }

    let corpus_size = tokenized.len() as f64;
    let idf: Vec<f64> = doc_freq.iter().map(|&df| (corpus_size / df.max(1) as f64).ln()).collect();

    let vectors = tokenized
        .iter()
        .zip(&chunk_counts)
        .map(|(tokens, counts)| {
            let mut vector = vec![0.0; vocabulary.len()];
            if !tokens.is_empty() {
                let len = tokens.len() as f64;
                for (&i, &count) in counts {
                    vector[i] = (count as f64 / len) * idf[i];
                }
            }
            vector
        })
        .collect();

    tracing::debug!(chunks = tokenized.len(), terms = vocabulary.len(), "built vector space");
    VectorSpace { vocabulary, vectors, idf }
}

/// Raw term-frequency vector of `query` over `vocabulary`. Query terms
/// outside the vocabulary still count toward the token total.
pub fn vectorize_query(query: &str, vocabulary: &Vocabulary) -> Vector {
    let tokens = normalize(query);
    let mut vector = vec![0.0; vocabulary.len()];
    if tokens.is_empty() {
        return vector;
    }
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for token in &tokens {
        if let Some(i) = vocabulary.position(token) {
            *counts.entry(i).or_insert(0) += 1;
        }
    }
    let len = tokens.len() as f64;
    for (i, count) in counts {
        vector[i] = count as f64 / len;
    }
    vector
}

/// Cosine of the angle between `a` and `b`; 0 when either has zero
/// magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::VectorLengthMismatch { left: a.len(), right: b.len() });
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus() {
        let space = build_vectors::<&str>(&[]);
        assert!(space.vocabulary.is_empty());
        assert!(space.vectors.is_empty());
    }

    #[test]
    fn single_chunk_single_term_has_zero_idf() {
        let space = build_vectors(&["apple apple apple"]);
        assert_eq!(space.vocabulary.terms(), ["apple"]);
        assert_eq!(space.vectors, vec![vec![0.0]]);
    }

    #[test]
    fn stopword_only_chunk_yields_empty_vocabulary() {
        // "a" is both a stopword and too short, so nothing survives.
        let space = build_vectors(&["a a a"]);
        assert!(space.vocabulary.is_empty());
        assert_eq!(space.vectors, vec![Vec::<f64>::new()]);
    }

    #[test]
    fn tf_idf_weights() {
        let space = build_vectors(&["apple banana", "apple cherry cherry", "the of"]);
        assert_eq!(space.vocabulary.terms(), ["apple", "banana", "cherry"]);
        let ln = |x: f64| x.ln();
        let expected = [
            vec![0.5 * ln(3.0 / 2.0), 0.5 * ln(3.0), 0.0],
            vec![(1.0 / 3.0) * ln(3.0 / 2.0), 0.0, (2.0 / 3.0) * ln(3.0)],
            vec![0.0, 0.0, 0.0],
        ];
        for (got, want) in space.vectors.iter().zip(&expected) {
            for (g, w) in got.iter().zip(want) {
                assert!((g - w).abs() < 1e-12, "{got:?} vs {want:?}");
            }
        }
    }

    #[test]
    fn rebuild_is_identical() {
        let chunks = ["Cats chase mice", "dogs chase cats", "mice eat cheese quietly"];
        assert_eq!(build_vectors(&chunks), build_vectors(&chunks));
    }

    #[test]
    fn query_is_term_frequency_only() {
        let space = build_vectors(&["apple banana", "cherry"]);
        let v = vectorize_query("apples and unknown bananas apple", &space.vocabulary);
        // tokens: apple, unknown, banana, apple
        assert_eq!(v, vec![0.5, 0.25, 0.0]);
        assert_eq!(space.vectorize_query("apple", QueryWeighting::TermFrequency), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn tf_idf_query_weighting() {
        let space = build_vectors(&["apple banana", "apple cherry"]);
        let v = space.vectorize_query("banana apple", QueryWeighting::TfIdf);
        assert_eq!(v, vec![0.0, 0.5 * 2f64.ln(), 0.0]);
    }

    #[test]
    fn empty_query_is_zero_vector() {
        let space = build_vectors(&["apple banana", "cherry"]);
        assert_eq!(vectorize_query("the of !!", &space.vocabulary), vec![0.0; 3]);
    }

    #[test]
    fn cosine_self_and_zero() {
        let v = vec![0.3, -1.2, 4.5];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&v, &[0.0; 3]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_length_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(Error::VectorLengthMismatch { left: 1, right: 2 })
        );
    }
}
