//! The text-completion seam: the generation capability the pipeline calls.

use async_trait::async_trait;

use crate::error::GenerationError;

/// A black-box text completion endpoint.
///
/// Implementations wrap a concrete model service. For reproducible
/// retrieval-augmented answers, implementations are expected to decode
/// deterministically (temperature 0); the pipeline performs no retries,
/// so transient failures surface to the caller as
/// [`GenerationError`] values.
///
/// Authentication failures, unavailability, timeouts, and malformed-prompt
/// rejections map to the distinct [`GenerationError`] variants.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Complete the given prompt, returning the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Return the identifier of the underlying generation model.
    fn model_id(&self) -> &str;
}
