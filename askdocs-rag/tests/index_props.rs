//! Property tests for vector index search ordering and determinism.

use std::collections::HashMap;

use askdocs_rag::document::Chunk;
use askdocs_rag::index::VectorIndex;
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

fn chunk(i: usize) -> Chunk {
    Chunk {
        id: format!("chunk_{i}"),
        text: format!("text {i}"),
        metadata: HashMap::new(),
        document_id: "doc".to_string(),
    }
}

fn build_index(embeddings: Vec<Vec<f32>>) -> VectorIndex {
    let pairs = embeddings.into_iter().enumerate().map(|(i, e)| (chunk(i), e)).collect();
    VectorIndex::build(pairs, "test-model").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of stored embeddings, search returns results ordered by
    /// descending cosine similarity, bounded by both `k` and the corpus
    /// size.
    #[test]
    fn results_ordered_descending_and_bounded(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let count = embeddings.len();
        let index = build_index(embeddings);
        let results = index.search(&query, k).unwrap();

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= count);
        prop_assert_eq!(results.len(), k.min(count));

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }

    /// Two searches with identical inputs against an unmodified index
    /// return bit-identical ordered results.
    #[test]
    fn repeated_search_is_bit_identical(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let index = build_index(embeddings);
        let first = index.search(&query, k).unwrap();
        let second = index.search(&query, k).unwrap();

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.chunk.id, &b.chunk.id);
            prop_assert_eq!(a.score.to_bits(), b.score.to_bits());
        }
    }
}
