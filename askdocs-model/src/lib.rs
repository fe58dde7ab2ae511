//! # askdocs-model
//!
//! Generation model integrations for askdocs.
//!
//! ## Overview
//!
//! This crate provides [`CompletionModel`](askdocs_rag::CompletionModel)
//! implementations for the retrieval pipeline:
//!
//! - [`GroqClient`] — Groq's OpenAI-compatible chat-completions API
//!   (works against any compatible server via `with_base_url`)
//! - [`MockCompletionModel`] — deterministic model for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use askdocs_model::{GroqClient, GroqConfig};
//!
//! let model = GroqClient::new(GroqConfig::from_env()?)?;
//! ```
//!
//! Decoding temperature is pinned to 0 across providers: answers over an
//! unchanged index must be reproducible end to end.

pub mod groq;
pub mod mock;

pub use groq::{GROQ_API_BASE, GroqClient, GroqConfig};
pub use mock::MockCompletionModel;
