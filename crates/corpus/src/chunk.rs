use serde::{Deserialize, Serialize};

use crate::intent::Category;

/// A fixed passage of statutory text, the unit the semantic index embeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalChunk {
    pub id: String,
    pub category: Category,
    pub act: String,
    pub section: String,
    pub text: String,
}

impl LegalChunk {
    pub fn new(id: &str, category: Category, section: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            category,
            act: category.act().to_string(),
            section: section.to_string(),
            text: text.to_string(),
        }
    }

    /// Header used when the chunk is quoted into a model context.
    pub fn heading(&self) -> String {
        format!("[{} - {}]", self.category.label(), self.section)
    }

    /// Estimate token count (rough: 1.3 tokens per word)
    pub fn estimated_tokens(&self) -> usize {
        let word_count = self.text.split_whitespace().count();
        (word_count as f64 * 1.3) as usize
    }
}
