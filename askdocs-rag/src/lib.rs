//! # askdocs-rag
//!
//! Retrieval core for askdocs: answer natural-language questions about a
//! fixed corpus of internal documents by retrieving the most relevant text
//! fragments and asking a language model to compose an answer grounded in
//! them (retrieval-augmented generation).
//!
//! ## Overview
//!
//! Build time: documents → [`Chunker`] → [`EmbeddingProvider`] →
//! [`VectorIndex`]. Query time: question → [`EmbeddingProvider`] →
//! [`VectorIndex::search`] → [`Retriever`] → [`PromptAssembler`] →
//! [`CompletionModel`] → answer. The [`RagPipeline`] composes the whole
//! flow and guarantees the index is built exactly once per process
//! lifetime.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askdocs_rag::{DirSource, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .source(Arc::new(DirSource::new("docs")))
//!     .embedder(Arc::new(my_embedder))
//!     .model(Arc::new(my_model))
//!     .build()?;
//!
//! pipeline.ingest().await?;
//! let answer = pipeline.answer("How long do refunds take?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod source;

pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{GenerationError, RagError, Result};
pub use generation::CompletionModel;
pub use index::VectorIndex;
pub use openai::OpenAiEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::PromptAssembler;
pub use retriever::Retriever;
pub use source::{DirSource, DocumentSource, StaticSource};
