//! Mock completion model for tests and zero-key demos.

use std::sync::atomic::{AtomicUsize, Ordering};

use askdocs_rag::{CompletionModel, GenerationError};
use async_trait::async_trait;

enum Behavior {
    Fixed(String),
    TimeOut { seconds: u64 },
}

/// A deterministic [`CompletionModel`] that never talks to a network.
///
/// Returns a fixed string (or a scripted timeout) and counts its calls, so
/// tests can assert both what was generated and whether generation was
/// attempted at all.
pub struct MockCompletionModel {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockCompletionModel {
    /// A model that answers every prompt with `response`.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self { behavior: Behavior::Fixed(response.into()), calls: AtomicUsize::new(0) }
    }

    /// A model whose every call fails with a timeout.
    pub fn timing_out(seconds: u64) -> Self {
        Self { behavior: Behavior::TimeOut { seconds }, calls: AtomicUsize::new(0) }
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(response) => Ok(response.clone()),
            Behavior::TimeOut { seconds } => Err(GenerationError::Timeout {
                provider: "mock".to_string(),
                seconds: *seconds,
            }),
        }
    }

    fn model_id(&self) -> &str {
        "mock-completion"
    }
}
