pub mod embeddings;
pub mod semantic;

pub use embeddings::{cosine_similarity, Embedder, HashingEmbedder};
pub use semantic::{IndexChunk, SemanticIndex, SemanticMatch, DEFAULT_TOP_K};
