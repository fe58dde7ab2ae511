//! Query-time retrieval: embed the question, search the index.

use std::sync::Arc;

use tracing::debug;

use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Embeds a question and returns the most similar chunks from a
/// [`VectorIndex`].
///
/// Construction verifies that the embedder and the index agree on the
/// embedding model; serving queries against an index built with a
/// different model is rejected rather than silently producing garbage
/// rankings.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
}

impl Retriever {
    /// Create a retriever over `index` using `embedder` for questions.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelMismatch`] if the embedder's model differs
    /// from the one the index was built with.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<VectorIndex>) -> Result<Self> {
        if embedder.model_id() != index.model_id() {
            return Err(RagError::ModelMismatch {
                index_model: index.model_id().to_string(),
                query_model: embedder.model_id().to_string(),
            });
        }
        Ok(Self { embedder, index })
    }

    /// Retrieve the `k` chunks most relevant to `question`, discarding
    /// scores.
    ///
    /// The embedding call is the only operation on this path that may
    /// block on an external service.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<Chunk>> {
        let results = self.retrieve_scored(question, k).await?;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }

    /// Retrieve the `k` most relevant chunks with their similarity scores,
    /// for callers that filter on relevance (e.g. a similarity floor).
    pub async fn retrieve_scored(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, k)?;
        debug!(k, returned = results.len(), "retrieved chunks");
        Ok(results)
    }

    /// The index this retriever searches.
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }
}
