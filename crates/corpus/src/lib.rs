pub mod chunk;
pub mod intent;
pub mod statutes;

pub use chunk::LegalChunk;
pub use intent::{Category, Intent};
pub use statutes::statutory_corpus;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_corpus_covers_every_category() {
        let corpus = statutory_corpus();

        for category in Category::ALL {
            let count = corpus.iter().filter(|c| c.category == category).count();
            assert!(count >= 5, "{} has only {} chunks", category, count);
        }
    }

    #[test]
    fn test_chunk_ids_are_unique() {
        let corpus = statutory_corpus();
        let ids: HashSet<_> = corpus.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), corpus.len());
    }

    #[test]
    fn test_chunk_act_follows_category() {
        let corpus = statutory_corpus();
        let chunk = corpus.iter().find(|c| c.id == "dv_court_orders").unwrap();

        assert_eq!(chunk.act, Category::DomesticViolence.act());
        assert_eq!(chunk.heading(), "[Domestic Violence - Court Orders Available]");
        assert!(chunk.estimated_tokens() > 50);
    }
}
