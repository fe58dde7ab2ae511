//! Console chat surface for askdocs.
//!
//! Loads the document corpus, builds the index once at startup, then loops
//! over stdin questions. Requires `GROQ_API_KEY` (generation) and
//! `OPENAI_API_KEY` (embeddings); both may live in a `.env` file.
//!
//! Run: `askdocs-chat [docs-dir]` (defaults to `docs`).

mod session;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use askdocs_model::{GroqClient, GroqConfig};
use askdocs_rag::{DirSource, OpenAiEmbeddingProvider, RagConfig, RagPipeline};
use session::ConversationState;
use tracing::error;

/// Submit one question: the user turn is logged on submission, the
/// assistant turn only when generation succeeds — a failed request leaves
/// the history without an assistant turn.
async fn submit(
    pipeline: &RagPipeline,
    session: &mut ConversationState,
    question: &str,
) -> askdocs_rag::Result<String> {
    session.push_user(question);
    let answer = pipeline.answer(question).await?;
    session.push_assistant(answer.as_str());
    Ok(answer)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (for GROQ_API_KEY / OPENAI_API_KEY).
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let docs_dir = std::env::args().nth(1).unwrap_or_else(|| "docs".to_string());

    let embedder = Arc::new(
        OpenAiEmbeddingProvider::from_env().context(
            "embedding backend unavailable.\n\
             Set OPENAI_API_KEY (or put it in a .env file)",
        )?,
    );
    let model = Arc::new(
        GroqClient::new(GroqConfig::from_env().context(
            "generation backend unavailable.\n\
             Set GROQ_API_KEY (or put it in a .env file)",
        )?)
        .context("failed to construct the generation client")?,
    );

    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .source(Arc::new(DirSource::new(&docs_dir)))
        .embedder(embedder)
        .model(model)
        .build()
        .context("invalid pipeline configuration")?;

    // Startup barrier: ingestion must complete before any question is
    // served; a failure here is terminal.
    println!("Processing knowledge base in '{docs_dir}'...");
    let index = pipeline
        .ingest()
        .await
        .context("failed to build the document index")?;
    println!("Ready: {} chunks indexed. Ask away (exit/quit to leave).\n", index.len());

    let mut session = ConversationState::new();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        match submit(&pipeline, &mut session, question).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => {
                // Report the failed request and keep serving; index and
                // session state are intact for the next question.
                error!(error = %e, "request failed");
                eprintln!("Could not answer that: {e}\n");
            }
        }
    }

    Ok(())
}
