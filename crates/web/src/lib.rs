//! Live evidence from official government portals.

pub mod cache;
pub mod fetcher;
pub mod html;
pub mod registry;

pub use cache::{CacheStats, PageCache};
pub use fetcher::{EvidenceFragment, EvidenceProvider, FetchOutcome, WebEvidence, WebEvidenceFetcher};
pub use registry::{Source, SourceRegistry, DEFAULT_FETCH_TIMEOUT};
