use serde::Serialize;
use tracing::{debug, info};

use corpus::{Category, LegalChunk};

use crate::embeddings::{cosine_similarity, Embedder, HashingEmbedder};

/// Number of passages returned per lookup.
pub const DEFAULT_TOP_K: usize = 5;

/// A corpus passage together with its precomputed embedding.
pub struct IndexChunk {
    pub chunk: LegalChunk,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemanticMatch<'a> {
    pub chunk: &'a LegalChunk,
    pub distance: f32,
}

/// In-memory nearest-neighbour index over the statutory corpus.
///
/// Built once at startup and read-only afterwards, so it can be shared across
/// requests behind an `Arc` without locking.
pub struct SemanticIndex {
    embedder: Box<dyn Embedder>,
    chunks: Vec<IndexChunk>,
}

impl SemanticIndex {
    pub fn build(corpus: Vec<LegalChunk>, embedder: impl Embedder + 'static) -> Self {
        let chunks: Vec<IndexChunk> = corpus
            .into_iter()
            .map(|chunk| {
                let embedding = embedder.embed(&chunk.text);
                IndexChunk { chunk, embedding }
            })
            .collect();

        info!(
            chunks = chunks.len(),
            dim = embedder.dimension(),
            "Semantic index built"
        );

        Self {
            embedder: Box::new(embedder),
            chunks,
        }
    }

    /// The statutory corpus embedded with the default hashing embedder.
    pub fn statutory() -> Self {
        Self::build(corpus::statutory_corpus(), HashingEmbedder::default())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The `k` passages of `category` closest to `text`. Equal distances keep
    /// corpus order.
    pub fn query(&self, text: &str, category: Category, k: usize) -> Vec<SemanticMatch<'_>> {
        self.search(text, Some(category), k)
    }

    /// Like `query`, but `None` searches every category.
    pub fn search(&self, text: &str, category: Option<Category>, k: usize) -> Vec<SemanticMatch<'_>> {
        let query_embedding = self.embedder.embed(text);

        let mut matches: Vec<SemanticMatch<'_>> = self
            .chunks
            .iter()
            .filter(|c| category.is_none_or(|cat| c.chunk.category == cat))
            .map(|c| SemanticMatch {
                chunk: &c.chunk,
                distance: 1.0 - cosine_similarity(&query_embedding, &c.embedding),
            })
            .collect();

        // sort_by is stable, which gives the insertion-order tie break
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(k);

        debug!(
            category = category.map(|c| c.label()).unwrap_or("any"),
            returned = matches.len(),
            "Semantic lookup"
        );

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_filters_by_category() {
        let index = SemanticIndex::statutory();
        let matches = index.query("my husband hits me", Category::DomesticViolence, DEFAULT_TOP_K);

        assert_eq!(matches.len(), DEFAULT_TOP_K);
        assert!(matches.iter().all(|m| m.chunk.category == Category::DomesticViolence));
    }

    #[test]
    fn test_query_orders_by_distance() {
        let index = SemanticIndex::statutory();
        let matches = index.query("first appeal second appeal information commission", Category::Rti, 5);

        for pair in matches.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert_eq!(matches[0].chunk.id, "rti_appeals_process");
    }

    #[test]
    fn test_query_is_deterministic() {
        let index = SemanticIndex::statutory();
        let a: Vec<_> = index.query("pension information", Category::Rti, 5).iter().map(|m| m.chunk.id.clone()).collect();
        let b: Vec<_> = index.query("pension information", Category::Rti, 5).iter().map(|m| m.chunk.id.clone()).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = SemanticIndex::statutory();
        // Nothing in this query survives tokenization, so every distance is 1.0
        let matches = index.query("the of and", Category::Divorce, 3);

        let ids: Vec<_> = matches.iter().map(|m| m.chunk.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["divorce_eligibility_types", "divorce_procedure_steps", "divorce_alimony_maintenance"]
        );
    }

    #[test]
    fn test_k_larger_than_category() {
        let index = SemanticIndex::statutory();
        let matches = index.query("custody", Category::Divorce, 50);
        assert_eq!(matches.len(), 5);
    }
}
