//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — slides a fixed-size character window with
//!   configurable overlap
//! - [`RecursiveChunker`] — splits hierarchically by paragraphs, sentences,
//!   then words, preferring the largest separator that respects the size
//!   bound
//!
//! All sizes and overlaps are counted in characters (Unicode scalar
//! values), never bytes, so multi-byte text is never split mid-character.

use std::collections::HashMap;

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations are deterministic: identical input always yields an
/// identical, identically-ordered chunk sequence. A document with empty
/// text produces an empty `Vec`, not an error.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Validate a `(chunk_size, chunk_overlap)` pair.
///
/// `chunk_overlap >= chunk_size` would make the window advance by zero or
/// a negative amount, so it is rejected up front; `chunk_size == 0` is
/// folded into the same check.
fn validate_params(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(RagError::Config(format!(
            "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Number of characters in `text`.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Character-window splitting with overlap.
///
/// Windows are `chunk_size` characters and advance by
/// `chunk_size - chunk_overlap`; the final window may be short. Splitting
/// stops once a window reaches the end of the text, so no trailing chunk is
/// ever wholly contained in its predecessor. Consequently every chunk
/// except the last has exactly `chunk_size` characters, consecutive chunks
/// share exactly `chunk_overlap` characters, and re-concatenating the
/// chunks with the leading overlap removed reproduces the input exactly.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, so windows slice safely.
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = offsets.len();
    let byte_at = |i: usize| if i < total { offsets[i] } else { text.len() };

    let step = chunk_size - chunk_overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(total);
        chunks.push(text[byte_at(start)..byte_at(end)].to_string());
        if end == total {
            break;
        }
        start += step;
    }

    chunks
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so merging segments back together is lossless.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`. A segment that exceeds `chunk_size` on its own is split
/// further using the next-level separator; past the last separator the
/// character window takes over.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let segments = split_keeping_separator(text, separator);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for segment in segments {
        let segment_len = char_len(segment);
        if current.is_empty() || current_len + segment_len <= chunk_size {
            current.push_str(segment);
            current_len += segment_len;
        } else {
            // Current chunk is full — flush it
            if current_len > chunk_size {
                chunks.extend(split_and_merge(
                    &current,
                    chunk_size,
                    chunk_overlap,
                    remaining_separators,
                ));
            } else {
                chunks.push(current);
            }
            current = segment.to_string();
            current_len = segment_len;
        }
    }

    if !current.is_empty() {
        if current_len > chunk_size {
            chunks.extend(split_and_merge(&current, chunk_size, chunk_overlap, remaining_separators));
        } else {
            chunks.push(current);
        }
    }

    chunks
}

/// Attach document metadata and ids to raw chunk texts.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`; each chunk
/// inherits the parent document's metadata plus a `chunk_index` field
/// recording its position in document order.
fn into_chunks(document: &Document, raw_chunks: Vec<String>) -> Vec<Chunk> {
    raw_chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mut metadata: HashMap<String, String> = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), i.to_string());
            Chunk {
                id: format!("{}_{i}", document.id),
                text,
                metadata,
                document_id: document.id.clone(),
            }
        })
        .collect()
}

/// Splits text into fixed-size chunks by character count with configurable
/// overlap.
///
/// # Example
///
/// ```rust,ignore
/// use askdocs_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_overlap >= chunk_size` or
    /// `chunk_size == 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_params(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        into_chunks(document, split_by_size(&document.text, self.chunk_size, self.chunk_overlap))
    }
}

/// Splits text hierarchically: paragraphs → sentences → words → characters.
///
/// First splits on paragraph separators (`\n\n`). A paragraph that exceeds
/// `chunk_size` is split on sentence boundaries (`. `, `! `, `? `), then
/// word boundaries, and finally falls back to the fixed character window.
/// Separators stay attached to the preceding segment, so no text is lost
/// at split points.
///
/// # Example
///
/// ```rust,ignore
/// use askdocs_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Separator priority, largest unit first.
    const SEPARATORS: [&'static str; 5] = ["\n\n", ". ", "! ", "? ", " "];

    /// Create a new `RecursiveChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_overlap >= chunk_size` or
    /// `chunk_size == 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_params(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let raw_chunks = split_and_merge(
            &document.text,
            self.chunk_size,
            self.chunk_overlap,
            &Self::SEPARATORS,
        );
        into_chunks(document, raw_chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "doc".to_string(),
            text: text.to_string(),
            metadata: HashMap::new(),
            source_uri: None,
        }
    }

    /// Reassemble chunk texts, removing the leading overlap of every chunk
    /// after the first.
    fn reassemble(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn rejects_overlap_not_less_than_size() {
        assert!(matches!(FixedSizeChunker::new(10, 10), Err(RagError::Config(_))));
        assert!(matches!(FixedSizeChunker::new(10, 15), Err(RagError::Config(_))));
        assert!(matches!(FixedSizeChunker::new(0, 0), Err(RagError::Config(_))));
        assert!(matches!(RecursiveChunker::new(5, 5), Err(RagError::Config(_))));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = FixedSizeChunker::new(10, 2).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());

        let chunker = RecursiveChunker::new(10, 2).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn fixed_size_window_invariants() {
        let chunker = FixedSizeChunker::new(4, 2).unwrap();
        let chunks = chunker.chunk(&doc("abcdefghij"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "cdef", "efgh", "ghij"]);

        // Every chunk except the last has exactly chunk_size chars.
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.text.chars().count(), 4);
        }
        // Consecutive chunks share exactly chunk_overlap characters.
        for pair in chunks.windows(2) {
            let tail: String = pair[0].text.chars().skip(2).collect();
            let head: String = pair[1].text.chars().take(2).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn reassembly_reproduces_input() {
        let text = "The quick brown fox jumps over the lazy dog";
        let chunker = FixedSizeChunker::new(7, 3).unwrap();
        let chunks = chunker.chunk(&doc(text));
        assert_eq!(reassemble(&chunks, 3), text);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = FixedSizeChunker::new(100, 20).unwrap();
        let chunks = chunker.chunk(&doc("short"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short");
        assert_eq!(chunks[0].id, "doc_0");
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "héllo wörld çà et là";
        let chunker = FixedSizeChunker::new(5, 1).unwrap();
        let chunks = chunker.chunk(&doc(text));

        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.text.chars().count(), 5);
        }
        assert_eq!(reassemble(&chunks, 1), text);
    }

    #[test]
    fn chunk_metadata_records_index_and_parent() {
        let mut document = doc("abcdefghij");
        document.metadata.insert("topic".to_string(), "letters".to_string());

        let chunker = FixedSizeChunker::new(4, 0).unwrap();
        let chunks = chunker.chunk(&document);

        assert_eq!(chunks[1].id, "doc_1");
        assert_eq!(chunks[1].document_id, "doc");
        assert_eq!(chunks[1].metadata.get("chunk_index"), Some(&"1".to_string()));
        assert_eq!(chunks[1].metadata.get("topic"), Some(&"letters".to_string()));
    }

    #[test]
    fn recursive_keeps_short_paragraphs_whole() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird one here.";
        let chunker = RecursiveChunker::new(40, 5).unwrap();
        let chunks = chunker.chunk(&doc(text));

        // Paragraphs merge up to the size bound but are never split.
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect::<String>();
        assert_eq!(joined, text);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 40));
    }

    #[test]
    fn recursive_splits_oversized_paragraph_by_sentence() {
        let text = "One sentence here. Another sentence there. A third sentence follows. \
                    And a fourth to overflow the bound.";
        let chunker = RecursiveChunker::new(50, 10).unwrap();
        let chunks = chunker.chunk(&doc(text));

        assert!(chunks.len() > 1);
        // No text is lost at split points.
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn recursive_is_deterministic() {
        let text = "Paragraph one with some words.\n\nParagraph two with more words. \
                    And a second sentence.";
        let chunker = RecursiveChunker::new(30, 5).unwrap();
        let first = chunker.chunk(&doc(text));
        let second = chunker.chunk(&doc(text));
        assert_eq!(first, second);
    }
}
