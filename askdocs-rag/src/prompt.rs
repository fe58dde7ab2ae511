//! Prompt assembly: retrieved context plus the question, under a fixed
//! behavioral preamble.

use tracing::warn;

use crate::document::Chunk;

/// Default behavioral preamble: persona, tone, and grounding rules.
///
/// Static configuration, not logic — replace it with
/// [`PromptAssembler::with_preamble`] to retarget the assistant.
const DEFAULT_PREAMBLE: &str = "\
You are an experienced internal assistant helping colleagues find answers \
in the company's internal documentation.

You act like a helpful, reliable coworker: professional but approachable, \
clear and direct, without excessive formality or robotic language.

Answer guidelines:
1. Use only the information present in the provided context.
2. Never invent procedures, rules, or policies that are not explicit or \
clearly implied in the documents.
3. When the answer is well covered by the context, explain it clearly and \
practically, in steps where that helps.
4. When the answer is not fully covered, say so naturally and avoid \
presenting guesses as official procedure.
5. If the question is ambiguous, ask for clarification before assuming \
anything.
6. If the topic is outside the scope of the documents, say so clearly and \
directly.";

/// Formats retrieved chunks plus the question into a single instruction
/// payload for the generation model.
///
/// The assembled prompt is: the behavioral preamble, a `Context:` section
/// joining chunk texts with a blank-line separator in retrieval order, and
/// the verbatim question under `Question:`.
///
/// # Length policy
///
/// When `max_context_chars` is set and the joined context exceeds it,
/// whole chunks are dropped from the tail of the ranked list (lowest
/// relevance first) until the context fits. Chunks are never truncated
/// mid-chunk, and the drop is logged — context is never shed silently.
/// Unset (the default) means no bound.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    preamble: String,
    max_context_chars: Option<usize>,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self { preamble: DEFAULT_PREAMBLE.to_string(), max_context_chars: None }
    }
}

impl PromptAssembler {
    /// Create an assembler with the default preamble and no length bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the behavioral preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Bound the context section to at most `chars` characters, dropping
    /// whole chunks from the tail when exceeded.
    pub fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = Some(chars);
        self
    }

    /// Assemble the instruction payload from retrieved chunks and the
    /// question.
    pub fn assemble(&self, chunks: &[Chunk], question: &str) -> String {
        let kept = match self.max_context_chars {
            Some(budget) => self.fit_to_budget(chunks, budget),
            None => chunks,
        };

        let context =
            kept.iter().map(|c| c.text.as_str()).collect::<Vec<&str>>().join("\n\n");

        format!("{}\n\nContext:\n{context}\n\nQuestion:\n{question}\n", self.preamble)
    }

    /// Longest prefix of `chunks` whose joined context fits in `budget`
    /// characters.
    fn fit_to_budget<'a>(&self, chunks: &'a [Chunk], budget: usize) -> &'a [Chunk] {
        let mut end = chunks.len();
        while end > 0 {
            let joined_len: usize = chunks[..end]
                .iter()
                .map(|c| c.text.chars().count())
                .sum::<usize>()
                + 2 * (end - 1); // blank-line separators
            if joined_len <= budget {
                break;
            }
            end -= 1;
        }

        if end < chunks.len() {
            warn!(
                kept = end,
                dropped = chunks.len() - end,
                budget,
                "context exceeded length bound; dropped lowest-ranked chunks"
            );
        }
        &chunks[..end]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            id: format!("doc_{}", text.len()),
            text: text.to_string(),
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        }
    }

    #[test]
    fn prompt_contains_context_and_question_verbatim() {
        let assembler = PromptAssembler::new();
        let chunks = vec![chunk("Refunds are processed within 5 business days.")];
        let prompt = assembler.assemble(&chunks, "How long do refunds take?");

        assert!(prompt.contains("Refunds are processed within 5 business days."));
        assert!(prompt.contains("How long do refunds take?"));
        assert!(prompt.contains("Context:"));
        assert!(prompt.contains("Question:"));
    }

    #[test]
    fn chunks_join_with_blank_line_in_retrieval_order() {
        let assembler = PromptAssembler::new();
        let chunks = vec![chunk("first"), chunk("second")];
        let prompt = assembler.assemble(&chunks, "q");

        assert!(prompt.contains("first\n\nsecond"));
    }

    #[test]
    fn over_budget_drops_whole_chunks_from_the_tail() {
        let assembler = PromptAssembler::new().with_max_context_chars(12);
        let chunks = vec![chunk("aaaaa"), chunk("bbbbb"), chunk("ccccc")];
        // "aaaaa\n\nbbbbb" is 12 chars; adding "ccccc" would overflow.
        let prompt = assembler.assemble(&chunks, "q");

        assert!(prompt.contains("aaaaa"));
        assert!(prompt.contains("bbbbb"));
        assert!(!prompt.contains("ccccc"));
        // The survivor chunks appear whole, never cut mid-chunk.
        assert!(prompt.contains("aaaaa\n\nbbbbb"));
    }

    #[test]
    fn budget_smaller_than_any_chunk_drops_everything() {
        let assembler = PromptAssembler::new().with_max_context_chars(3);
        let prompt = assembler.assemble(&[chunk("too long to fit")], "q");

        assert!(!prompt.contains("too long"));
        assert!(prompt.contains("Question:\nq"));
    }

    #[test]
    fn custom_preamble_replaces_default() {
        let assembler = PromptAssembler::new().with_preamble("Answer tersely.");
        let prompt = assembler.assemble(&[chunk("ctx")], "q");

        assert!(prompt.starts_with("Answer tersely."));
        assert!(!prompt.contains("internal assistant"));
    }
}
