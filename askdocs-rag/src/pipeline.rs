//! The retrieve-then-generate pipeline orchestrator.
//!
//! [`RagPipeline`] composes a [`DocumentSource`], a [`Chunker`], an
//! [`EmbeddingProvider`], a [`PromptAssembler`], and a [`CompletionModel`]
//! into the end-to-end flow: build the index once, then for each question
//! retrieve → assemble → generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use askdocs_rag::{DirSource, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .source(Arc::new(DirSource::new("docs")))
//!     .embedder(Arc::new(embedder))
//!     .model(Arc::new(model))
//!     .build()?;
//!
//! pipeline.ingest().await?;            // startup barrier
//! let answer = pipeline.answer("How long do refunds take?").await?;
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::CompletionModel;
use crate::index::VectorIndex;
use crate::prompt::PromptAssembler;
use crate::retriever::Retriever;
use crate::source::DocumentSource;

/// The retrieve-then-generate pipeline.
///
/// The index is built exactly once per pipeline lifetime: either eagerly
/// via [`ingest()`](RagPipeline::ingest) as an explicit startup phase, or
/// lazily on the first [`answer()`](RagPipeline::answer). Concurrent first
/// callers are serialized by the construction barrier; once built, the
/// index is read-only and shared without locking.
///
/// Each `answer` call is atomic: it fully succeeds or fully fails, with no
/// retries and no partial answers.
pub struct RagPipeline {
    config: RagConfig,
    source: Arc<dyn DocumentSource>,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn CompletionModel>,
    assembler: PromptAssembler,
    index: OnceCell<Arc<VectorIndex>>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Build the index now, or return the already-built one.
    ///
    /// This is the one-time construction barrier: call it at startup so
    /// ingestion failures are terminal before any question is served.
    ///
    /// # Errors
    ///
    /// - [`RagError::Config`] if the document source is absent.
    /// - [`RagError::EmptyCorpus`] if the corpus yields no chunks.
    /// - [`RagError::EmbeddingUnavailable`] if corpus embedding fails —
    ///   an index built from partial embeddings is never served.
    pub async fn ingest(&self) -> Result<Arc<VectorIndex>> {
        self.index.get_or_try_init(|| self.build_index()).await.map(Arc::clone)
    }

    async fn build_index(&self) -> Result<Arc<VectorIndex>> {
        let documents = self.source.list()?;

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in &documents {
            chunks.extend(self.chunker.chunk(document));
        }
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "corpus embedding failed during ingestion");
            e
        })?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingUnavailable {
                provider: self.embedder.model_id().to_string(),
                message: format!(
                    "batch returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ),
            });
        }

        let pairs: Vec<(Chunk, Vec<f32>)> = chunks.into_iter().zip(embeddings).collect();
        let index = VectorIndex::build(pairs, self.embedder.model_id())?;

        info!(
            documents = documents.len(),
            chunks = index.len(),
            model = index.model_id(),
            "ingestion complete"
        );
        Ok(Arc::new(index))
    }

    /// Answer a question grounded in the indexed corpus.
    ///
    /// Sequence: ensure index → embed question → top-k search → assemble
    /// prompt → generation call. Ordering is preserved; the embedding and
    /// generation calls are the only external blocking points.
    ///
    /// # Errors
    ///
    /// Ingestion errors pass through on a lazy first call (see
    /// [`ingest()`](RagPipeline::ingest)). Query-time embedding failures
    /// surface as [`RagError::EmbeddingUnavailable`]; a failed generation
    /// call surfaces as [`RagError::Generation`] carrying the question and
    /// the underlying cause. Either way the index and any session state
    /// are left intact for the next request.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let index = self.ingest().await?;
        let retriever = Retriever::new(self.embedder.clone(), index)?;

        let mut results = retriever.retrieve_scored(question, self.config.top_k).await?;
        if let Some(floor) = self.config.similarity_floor {
            results.retain(|r| r.score >= floor);
        }
        let chunks: Vec<Chunk> = results.into_iter().map(|r| r.chunk).collect();

        let prompt = self.assembler.assemble(&chunks, question);
        debug!(chunks = chunks.len(), prompt_chars = prompt.chars().count(), "assembled prompt");

        let answer = self.model.complete(&prompt).await.map_err(|source| {
            error!(error = %source, "generation failed");
            RagError::Generation { question: question.to_string(), source }
        })?;

        info!(answer_chars = answer.chars().count(), "answered question");
        Ok(answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config`, `source`, `embedder`, and `model` are required. The chunker
/// defaults to a [`RecursiveChunker`] derived from the config, and the
/// assembler to [`PromptAssembler::default()`] with the config's context
/// bound applied.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    source: Option<Arc<dyn DocumentSource>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn CompletionModel>>,
    assembler: Option<PromptAssembler>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document source.
    pub fn source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the document chunker (defaults to a [`RecursiveChunker`] built
    /// from the config).
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generation model.
    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the prompt assembler (defaults to the standard preamble).
    pub fn assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = Some(assembler);
        self
    }

    /// Build the [`RagPipeline`], validating that all required parts are
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the
    /// configuration is inconsistent.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let source =
            self.source.ok_or_else(|| RagError::Config("source is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let model =
            self.model.ok_or_else(|| RagError::Config("model is required".to_string()))?;

        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        let assembler = match self.assembler {
            Some(assembler) => assembler,
            None => {
                let assembler = PromptAssembler::default();
                match config.max_context_chars {
                    Some(chars) => assembler.with_max_context_chars(chars),
                    None => assembler,
                }
            }
        };

        Ok(RagPipeline {
            config,
            source,
            chunker,
            embedder,
            model,
            assembler,
            index: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::GenerationError;
    use crate::source::StaticSource;

    struct NullEmbedder;

    #[async_trait]
    impl EmbeddingProvider for NullEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_id(&self) -> &str {
            "null-embedder"
        }
    }

    struct NullModel;

    #[async_trait]
    impl CompletionModel for NullModel {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            Ok("answer".to_string())
        }

        fn model_id(&self) -> &str {
            "null-model"
        }
    }

    #[test]
    fn builder_requires_all_parts() {
        let result = RagPipeline::builder().build();
        assert!(matches!(result, Err(RagError::Config(_))));

        let result = RagPipeline::builder().config(RagConfig::default()).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_rejects_inconsistent_config_for_default_chunker() {
        // An invalid config cannot sneak past the builder into the default
        // chunker.
        let config = RagConfig {
            chunk_size: 10,
            chunk_overlap: 10,
            top_k: 4,
            similarity_floor: None,
            max_context_chars: None,
        };
        let result = RagPipeline::builder()
            .config(config)
            .source(Arc::new(StaticSource::new(Vec::new())))
            .embedder(Arc::new(NullEmbedder))
            .model(Arc::new(NullModel))
            .build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }
}
