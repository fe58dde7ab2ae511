//! Property tests for chunker invariants.

use std::collections::HashMap;

use askdocs_rag::chunking::{Chunker, FixedSizeChunker};
use askdocs_rag::document::{Chunk, Document};
use askdocs_rag::error::RagError;
use proptest::prelude::*;

fn doc(text: &str) -> Document {
    Document {
        id: "doc".to_string(),
        text: text.to_string(),
        metadata: HashMap::new(),
        source_uri: None,
    }
}

/// Valid `(chunk_size, chunk_overlap)` pairs: `0 <= overlap < size`.
fn arb_valid_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..64).prop_flat_map(|size| (Just(size), 0..size))
}

/// Invalid pairs: `overlap >= size`.
fn arb_invalid_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..64).prop_flat_map(|size| (Just(size), size..size + 64))
}

/// Text mixing ASCII, accented, and multi-byte characters.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z A-Zéüßç日本語\\n]{0,200}"
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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Re-concatenating chunks with the overlap removed reproduces the
    /// original text exactly, for any text and any valid parameter pair.
    #[test]
    fn reassembly_reproduces_input(text in arb_text(), (size, overlap) in arb_valid_params()) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&doc(&text));
        prop_assert_eq!(reassemble(&chunks, overlap), text);
    }

    /// Every chunk except possibly the last has exactly `chunk_size`
    /// characters, and no chunk is empty.
    #[test]
    fn window_sizes_hold(text in arb_text(), (size, overlap) in arb_valid_params()) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&doc(&text));

        if let Some((last, rest)) = chunks.split_last() {
            for chunk in rest {
                prop_assert_eq!(chunk.text.chars().count(), size);
            }
            prop_assert!(last.text.chars().count() <= size);
            prop_assert!(!last.text.is_empty());
        }
    }

    /// `chunk_overlap >= chunk_size` always fails with a configuration
    /// error, for all such pairs.
    #[test]
    fn invalid_params_always_rejected((size, overlap) in arb_invalid_params()) {
        prop_assert!(matches!(
            FixedSizeChunker::new(size, overlap),
            Err(RagError::Config(_))
        ));
    }

    /// Identical input yields an identical, identically-ordered chunk
    /// sequence.
    #[test]
    fn chunking_is_deterministic(text in arb_text(), (size, overlap) in arb_valid_params()) {
        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let first = chunker.chunk(&doc(&text));
        let second = chunker.chunk(&doc(&text));
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_text_yields_empty_sequence_for_any_valid_params() {
    for size in 1..20 {
        for overlap in 0..size {
            let chunker = FixedSizeChunker::new(size, overlap).unwrap();
            assert!(chunker.chunk(&doc("")).is_empty());
        }
    }
}
