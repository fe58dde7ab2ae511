//! In-memory vector index with cosine similarity search.
//!
//! The [`VectorIndex`] is built exactly once from the full chunk set and is
//! read-only thereafter; share it across tasks with an `Arc`. There is no
//! mutation API and no persistence (the index lives and dies with the
//! process).

use tracing::info;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// An immutable collection of `(chunk, embedding)` pairs supporting
/// nearest-neighbor search by cosine similarity.
///
/// Entries keep their insertion order, which doubles as the tie-break for
/// equal scores: search output is fully deterministic for a given index
/// and query.
#[derive(Debug)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
    model_id: String,
}

impl VectorIndex {
    /// Build an index from `(chunk, embedding)` pairs.
    ///
    /// `embedding_model` records which model produced the vectors; it is
    /// checked against the query-time embedder when a
    /// [`Retriever`](crate::Retriever) is constructed.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] if `pairs` is empty — nothing to search
    ///   is a terminal, user-visible condition upstream, not a crash.
    /// - [`RagError::DimensionMismatch`] if the pairs disagree on
    ///   dimensionality.
    pub fn build(
        pairs: Vec<(Chunk, Vec<f32>)>,
        embedding_model: impl Into<String>,
    ) -> Result<Self> {
        if pairs.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let dimensions = pairs[0].1.len();
        let mut chunks = Vec::with_capacity(pairs.len());
        let mut embeddings = Vec::with_capacity(pairs.len());

        for (chunk, embedding) in pairs {
            if embedding.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    got: embedding.len(),
                });
            }
            chunks.push(chunk);
            embeddings.push(embedding);
        }

        let model_id = embedding_model.into();
        info!(entries = chunks.len(), dimensions, model = %model_id, "vector index built");

        Ok(Self { chunks, embeddings, dimensions, model_id })
    }

    /// Search for the `k` chunks most similar to `query`.
    ///
    /// Results are ordered by descending cosine similarity; equal scores
    /// keep insertion order (stable sort). A `k` larger than the corpus
    /// returns all entries rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `query` does not match
    /// the index dimensionality.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let mut scored: Vec<SearchResult> = self
            .chunks
            .iter()
            .zip(self.embeddings.iter())
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(embedding, query),
            })
            .collect();

        // Stable sort: insertion order breaks score ties.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks. Always false for a built index.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Dimensionality of the indexed embeddings.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Identifier of the model that produced the indexed embeddings.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}
