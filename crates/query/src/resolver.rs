use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use corpus::Intent;
use index::{SemanticIndex, SemanticMatch, DEFAULT_TOP_K};
use web::{EvidenceProvider, WebEvidence};

/// Aggregated portal text shorter than this is treated as a failed fetch.
pub const MIN_WEB_EVIDENCE_CHARS: usize = 300;

const WEB_HEADER: &str = "=== LIVE DATA FROM OFFICIAL GOVERNMENT PORTALS ===";
const FUSED_SEMANTIC_HEADER: &str = "=== ADDITIONAL CONTEXT FROM LEGAL KNOWLEDGE BASE ===";
const SEMANTIC_HEADER: &str = "=== CONTEXT FROM LEGAL KNOWLEDGE BASE ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextOrigin {
    #[serde(rename = "WEB+RAG")]
    WebAndSemantic,
    #[serde(rename = "RAG")]
    SemanticOnly,
    /// Out-of-scope turns resolve no context at all.
    #[serde(rename = "NONE")]
    Skipped,
}

impl ContextOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            ContextOrigin::WebAndSemantic => "WEB+RAG",
            ContextOrigin::SemanticOnly => "RAG",
            ContextOrigin::Skipped => "NONE",
        }
    }
}

/// Decide whether live evidence is strong enough to lead the context.
pub fn select_origin(web: &WebEvidence) -> ContextOrigin {
    if web.char_len() >= MIN_WEB_EVIDENCE_CHARS {
        ContextOrigin::WebAndSemantic
    } else {
        ContextOrigin::SemanticOnly
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextBundle {
    pub origin: ContextOrigin,
    pub text: String,
    /// Sources whose text is in `text`. Empty unless origin is `WebAndSemantic`.
    pub citations: Vec<String>,
    /// Corpus passage ids, nearest first.
    pub passages: Vec<String>,
    pub web_chars: usize,
}

impl ContextBundle {
    pub fn empty() -> Self {
        Self {
            origin: ContextOrigin::Skipped,
            text: String::new(),
            citations: Vec::new(),
            passages: Vec::new(),
            web_chars: 0,
        }
    }

    fn fuse(web: WebEvidence, matches: &[SemanticMatch<'_>]) -> Self {
        let web_chars = web.char_len();
        let semantic = render_passages(matches);
        let passages = matches.iter().map(|m| m.chunk.id.clone()).collect();

        match select_origin(&web) {
            ContextOrigin::WebAndSemantic => Self {
                origin: ContextOrigin::WebAndSemantic,
                text: format!("{}\n{}\n\n{}\n{}", WEB_HEADER, web.text, FUSED_SEMANTIC_HEADER, semantic),
                citations: web.sources,
                passages,
                web_chars,
            },
            _ => Self {
                origin: ContextOrigin::SemanticOnly,
                text: format!("{}\n{}", SEMANTIC_HEADER, semantic),
                citations: Vec::new(),
                passages,
                web_chars,
            },
        }
    }
}

fn render_passages(matches: &[SemanticMatch<'_>]) -> String {
    matches
        .iter()
        .map(|m| format!("{}\n{}", m.chunk.heading(), m.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Combines live portal evidence with the statutory index.
pub struct ContextResolver {
    provider: Arc<dyn EvidenceProvider>,
    index: Arc<SemanticIndex>,
    top_k: usize,
}

impl ContextResolver {
    pub fn new(provider: Arc<dyn EvidenceProvider>, index: Arc<SemanticIndex>) -> Self {
        Self {
            provider,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn index(&self) -> &SemanticIndex {
        &self.index
    }

    /// Never fails: fetch problems degrade to a semantic-only bundle.
    pub async fn resolve(&self, query: &str, intent: Intent) -> ContextBundle {
        let Some(category) = intent.category() else {
            return ContextBundle::empty();
        };

        let web = self.provider.gather(query, category).await;
        let matches = self.index.query(query, category, self.top_k);
        let bundle = ContextBundle::fuse(web, &matches);

        info!(
            intent = %intent,
            origin = bundle.origin.label(),
            web_chars = bundle.web_chars,
            citations = bundle.citations.len(),
            passages = bundle.passages.len(),
            "Context resolved"
        );
        bundle
    }
}
