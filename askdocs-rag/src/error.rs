//! Error types for the `askdocs-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid configuration: bad chunking parameters, an incomplete
    /// builder, or a missing corpus source.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The corpus produced no chunks, so there is nothing to index.
    ///
    /// Surfaced before any generation call is attempted; upstream layers
    /// treat this as a terminal, user-visible condition.
    #[error("document corpus is empty: no chunks to index")]
    EmptyCorpus,

    /// The embedding backend could not be reached or failed to produce
    /// a vector. Propagated, never swallowed — an index built from partial
    /// embeddings is unsafe to serve.
    #[error("Embedding unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An embedding's dimensionality disagrees with the index.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimensionality the index was built with.
        expected: usize,
        /// Dimensionality of the offending vector.
        got: usize,
    },

    /// The query-time embedding model differs from the one the index was
    /// built with. Mixing models is rejected rather than silently served.
    #[error("embedding model mismatch: index built with '{index_model}', query uses '{query_model}'")]
    ModelMismatch {
        /// Model recorded in the index metadata.
        index_model: String,
        /// Model reported by the query-time embedder.
        query_model: String,
    },

    /// The generation call failed. Carries the originating question so the
    /// chat surface can report which request was lost.
    #[error("failed to answer {question:?}")]
    Generation {
        /// The question that was being answered.
        question: String,
        /// The underlying generation failure.
        #[source]
        source: GenerationError,
    },
}

/// Failures of the external generation capability.
///
/// Authentication, unavailability, and malformed-prompt failures are kept
/// distinct so callers can tell a misconfigured key from a flaky service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service rejected the credentials.
    #[error("authentication failed ({provider}): {message}")]
    Auth {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service could not be reached or returned a server-side failure.
    #[error("service unavailable ({provider}): {message}")]
    Unavailable {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The service rejected the request itself (malformed prompt or
    /// parameters).
    #[error("invalid request ({provider}): {message}")]
    InvalidRequest {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {seconds}s ({provider})")]
    Timeout {
        /// The generation provider that produced the error.
        provider: String,
        /// The deadline that elapsed.
        seconds: u64,
    },
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
