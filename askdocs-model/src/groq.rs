//! Groq chat-completions client.
//!
//! Groq serves OpenAI-compatible chat completions; this client calls the
//! `/chat/completions` endpoint directly over `reqwest`. Decoding
//! temperature is pinned to 0 so repeated generations over an unchanged
//! index are reproducible.

use std::time::Duration;

use askdocs_rag::{CompletionModel, GenerationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The Groq OpenAI-compatible API base.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// The default generation model.
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Default deadline for a generation call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for bearer authentication.
    pub api_key: String,
    /// Model identifier (defaults to `llama-3.1-8b-instant`).
    pub model: String,
    /// API base URL; point it at any OpenAI-compatible server.
    pub base_url: String,
    /// Request deadline in seconds.
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Create a config with the default model, base URL, and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a config from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| GenerationError::Auth {
            provider: "Groq".to_string(),
            message: "GROQ_API_KEY environment variable not set".to_string(),
        })?;
        Ok(Self::new(api_key))
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request deadline in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// A [`CompletionModel`] backed by the Groq chat-completions API.
///
/// # Example
///
/// ```rust,ignore
/// use askdocs_model::{GroqClient, GroqConfig};
///
/// let model = GroqClient::new(GroqConfig::from_env()?)?;
/// let text = model.complete("Say hello.").await?;
/// ```
pub struct GroqClient {
    client: reqwest::Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Auth`] if the API key is empty, and
    /// [`GenerationError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: GroqConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::Auth {
                provider: "Groq".to_string(),
                message: "API key must not be empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable {
                provider: "Groq".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }
}

// ── API request/response types ─────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    // Pinned to 0 — answers over an unchanged index must be reproducible.
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map an HTTP status to the distinct generation failure kinds.
fn status_error(status: reqwest::StatusCode, detail: String) -> GenerationError {
    let provider = "Groq".to_string();
    match status.as_u16() {
        401 | 403 => GenerationError::Auth { provider, message: detail },
        408 | 429 | 500..=599 => GenerationError::Unavailable {
            provider,
            message: format!("{status}: {detail}"),
        },
        _ => GenerationError::InvalidRequest {
            provider,
            message: format!("{status}: {detail}"),
        },
    }
}

#[async_trait]
impl CompletionModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(model = %self.config.model, prompt_len = prompt.len(), "generation request");

        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                if e.is_timeout() {
                    GenerationError::Timeout {
                        provider: "Groq".to_string(),
                        seconds: self.config.timeout_secs,
                    }
                } else {
                    GenerationError::Unavailable {
                        provider: "Groq".to_string(),
                        message: format!("request failed: {e}"),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Groq", %status, "API error");
            return Err(status_error(status, detail));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "Groq", error = %e, "failed to parse response");
            GenerationError::Unavailable {
                provider: "Groq".to_string(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerationError::Unavailable {
                provider: "Groq".to_string(),
                message: "API returned no choices".to_string(),
            })?;

        debug!(answer_len = text.len(), "generation complete");
        Ok(text)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_an_auth_error() {
        let result = GroqClient::new(GroqConfig::new(""));
        assert!(matches!(result, Err(GenerationError::Auth { .. })));
    }

    #[test]
    fn status_codes_map_to_distinct_failures() {
        use reqwest::StatusCode;

        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key".into()),
            GenerationError::Auth { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "no access".into()),
            GenerationError::Auth { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "down".into()),
            GenerationError::Unavailable { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            GenerationError::Unavailable { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "malformed".into()),
            GenerationError::InvalidRequest { .. }
        ));
    }

    #[test]
    fn config_defaults() {
        let config = GroqConfig::new("key");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.base_url, GROQ_API_BASE);
        assert_eq!(config.timeout_secs, 30);
    }
}
