use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use corpus::Category;

use crate::cache::PageCache;
use crate::html;
use crate::registry::{Source, SourceRegistry};

const FRAGMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success,
    Timeout,
    /// HTTP error, network failure, or a page with no readable text.
    Error(String),
}

/// Result of one fetch attempt against one source.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceFragment {
    pub source: String,
    pub url: String,
    pub text: String,
    pub outcome: FetchOutcome,
}

impl EvidenceFragment {
    fn success(source: &Source, text: String) -> Self {
        Self {
            source: source.name.clone(),
            url: source.url.clone(),
            text,
            outcome: FetchOutcome::Success,
        }
    }

    fn failed(source: &Source, outcome: FetchOutcome) -> Self {
        Self {
            source: source.name.clone(),
            url: source.url.clone(),
            text: String::new(),
            outcome,
        }
    }

    pub fn contributed(&self) -> bool {
        self.outcome == FetchOutcome::Success && !self.text.trim().is_empty()
    }
}

/// Aggregated live evidence for one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebEvidence {
    /// Non-empty fragments in registry order, each prefixed with `[Source: name]`.
    pub text: String,
    /// Names of the sources that contributed to `text`, in the same order.
    pub sources: Vec<String>,
    pub fragments: Vec<EvidenceFragment>,
}

impl WebEvidence {
    pub fn from_fragments(fragments: Vec<EvidenceFragment>) -> Self {
        let mut parts = Vec::new();
        let mut sources = Vec::new();

        for fragment in fragments.iter().filter(|f| f.contributed()) {
            parts.push(format!("[Source: {}]\n{}", fragment.source, fragment.text.trim()));
            sources.push(fragment.source.clone());
        }

        Self {
            text: parts.join(FRAGMENT_SEPARATOR),
            sources,
            fragments,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Anything that can gather live evidence for a category.
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    async fn gather(&self, query: &str, category: Category) -> WebEvidence;
}

/// Fetches every source registered for a category concurrently, each under
/// its own timeout. Failures degrade to empty fragments and never abort the
/// siblings.
#[derive(Clone)]
pub struct WebEvidenceFetcher {
    client: reqwest::Client,
    registry: Arc<SourceRegistry>,
    cache: Option<PageCache>,
}

impl WebEvidenceFetcher {
    pub fn new(registry: Arc<SourceRegistry>, cache: Option<PageCache>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-IN,en;q=0.9"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            registry,
            cache,
        })
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Unbounded; `fetch_one` owns the per-source deadline.
    async fn download(&self, source: &Source) -> Result<String> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .context("Request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {}", response.status());
        }

        response.text().await.context("Failed to read body")
    }

    pub async fn fetch_one(&self, source: &Source) -> EvidenceFragment {
        if let Some(text) = self.cache.as_ref().and_then(|c| c.get(&source.url)) {
            info!(source = %source.name, chars = text.len(), "Cache hit");
            return EvidenceFragment::success(source, text);
        }

        let html = match tokio::time::timeout(source.timeout(), self.download(source)).await {
            Err(_) => {
                warn!(source = %source.name, url = %source.url, timeout_ms = source.timeout_ms, "Fetch timed out");
                return EvidenceFragment::failed(source, FetchOutcome::Timeout);
            }
            Ok(Err(e)) => {
                warn!(source = %source.name, url = %source.url, error = %e, "Fetch failed");
                return EvidenceFragment::failed(source, FetchOutcome::Error(format!("{:#}", e)));
            }
            Ok(Ok(html)) => html,
        };

        let text = html::extract_readable_text(&html);
        if text.is_empty() {
            warn!(source = %source.name, url = %source.url, "No readable text");
            return EvidenceFragment::failed(source, FetchOutcome::Error("empty page".to_string()));
        }

        info!(source = %source.name, chars = text.len(), "Fetched");
        if let Some(cache) = &self.cache {
            cache.insert(&source.url, text.clone());
        }
        EvidenceFragment::success(source, text)
    }
}

#[async_trait]
impl EvidenceProvider for WebEvidenceFetcher {
    async fn gather(&self, query: &str, category: Category) -> WebEvidence {
        let sources = self.registry.for_category(category);
        info!(
            category = category.label(),
            sources = sources.len(),
            query_chars = query.len(),
            "Gathering web evidence"
        );

        // join_all keeps input order, so aggregation follows the registry
        // regardless of which portal answers first
        let fragments = join_all(sources.iter().map(|s| self.fetch_one(s))).await;
        let evidence = WebEvidence::from_fragments(fragments);

        info!(
            category = category.label(),
            contributing = evidence.sources.len(),
            chars = evidence.char_len(),
            "Web evidence gathered"
        );
        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(body: &str) -> String {
        format!("<html><body><main><p>{}</p></main></body></html>", body)
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn source(server: &MockServer, name: &str, route: &str, timeout: Duration) -> Source {
        Source::new(name, &format!("{}{}", server.uri(), route), &[Category::Rti]).with_timeout(timeout)
    }

    #[test]
    fn test_aggregation_skips_failures_and_keeps_order() {
        let src = |name: &str| Source::new(name, "https://example.gov.in/", &[Category::Rti]);
        let fragments = vec![
            EvidenceFragment::success(&src("A"), "alpha text".to_string()),
            EvidenceFragment::failed(&src("B"), FetchOutcome::Timeout),
            EvidenceFragment::success(&src("C"), "gamma text".to_string()),
            EvidenceFragment::success(&src("D"), "   ".to_string()),
        ];

        let evidence = WebEvidence::from_fragments(fragments);

        assert_eq!(evidence.sources, vec!["A", "C"]);
        assert_eq!(evidence.text, "[Source: A]\nalpha text\n\n---\n\n[Source: C]\ngamma text");
        assert_eq!(evidence.fragments.len(), 4);
    }

    #[tokio::test]
    async fn test_slow_source_does_not_block_others() {
        let server = MockServer::start().await;
        let body = "The Public Information Officer must respond within thirty days of the request.";
        mount(&server, "/fast", ResponseTemplate::new(200).set_body_string(page(body))).await;
        mount(
            &server,
            "/slow",
            ResponseTemplate::new(200)
                .set_body_string(page(body))
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let registry = SourceRegistry::new(vec![
            source(&server, "Slow", "/slow", Duration::from_millis(300)),
            source(&server, "Fast", "/fast", Duration::from_secs(2)),
        ]);
        let fetcher = WebEvidenceFetcher::new(Arc::new(registry), None).unwrap();

        let started = Instant::now();
        let evidence = fetcher.gather("pension", Category::Rti).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(evidence.sources, vec!["Fast"]);
        assert_eq!(evidence.fragments[0].outcome, FetchOutcome::Timeout);
        assert_eq!(evidence.fragments[1].outcome, FetchOutcome::Success);
    }

    #[tokio::test]
    async fn test_latency_bounded_by_slowest_timeout_not_sum() {
        let server = MockServer::start().await;
        let slow = ResponseTemplate::new(200)
            .set_body_string(page("never arrives in time for the caller to use it at all"))
            .set_delay(Duration::from_secs(10));
        for route in ["/a", "/b", "/c"] {
            mount(&server, route, slow.clone()).await;
        }

        let timeout = Duration::from_secs(1);
        let registry = SourceRegistry::new(vec![
            source(&server, "A", "/a", timeout),
            source(&server, "B", "/b", timeout),
            source(&server, "C", "/c", timeout),
        ]);
        let fetcher = WebEvidenceFetcher::new(Arc::new(registry), None).unwrap();

        let started = Instant::now();
        let evidence = fetcher.gather("appeal", Category::Rti).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= timeout);
        assert!(elapsed < Duration::from_millis(2500), "took {:?}", elapsed);
        assert!(evidence.text.is_empty());
        assert!(evidence.fragments.iter().all(|f| f.outcome == FetchOutcome::Timeout));
    }

    #[tokio::test]
    async fn test_http_error_and_blank_page_yield_no_text() {
        let server = MockServer::start().await;
        mount(&server, "/down", ResponseTemplate::new(503)).await;
        mount(
            &server,
            "/blocked",
            ResponseTemplate::new(200).set_body_string("<html><body><p>Access denied</p></body></html>"),
        )
        .await;

        let registry = SourceRegistry::new(vec![
            source(&server, "Down", "/down", Duration::from_secs(2)),
            source(&server, "Blocked", "/blocked", Duration::from_secs(2)),
        ]);
        let fetcher = WebEvidenceFetcher::new(Arc::new(registry), None).unwrap();
        let evidence = fetcher.gather("rti", Category::Rti).await;

        assert!(evidence.sources.is_empty());
        assert!(matches!(evidence.fragments[0].outcome, FetchOutcome::Error(_)));
        assert!(matches!(evidence.fragments[1].outcome, FetchOutcome::Error(_)));
    }

    #[tokio::test]
    async fn test_only_matching_topics_are_fetched() {
        let server = MockServer::start().await;
        let body = "Magistrate must fix the first hearing within three days of receiving the application.";
        mount(&server, "/dv", ResponseTemplate::new(200).set_body_string(page(body))).await;

        let registry = SourceRegistry::new(vec![
            Source::new("DV", &format!("{}/dv", server.uri()), &[Category::DomesticViolence]),
            Source::new("Other", &format!("{}/other", server.uri()), &[Category::Divorce]),
        ]);
        let fetcher = WebEvidenceFetcher::new(Arc::new(registry), None).unwrap();
        let evidence = fetcher.gather("hearing", Category::DomesticViolence).await;

        assert_eq!(evidence.fragments.len(), 1);
        assert_eq!(evidence.sources, vec!["DV"]);
        assert!(evidence.text.starts_with("[Source: DV]\n"));
    }

    #[tokio::test]
    async fn test_cached_page_is_served_without_request() {
        let server = MockServer::start().await;
        let body = "Second appeal lies to the Central Information Commission within ninety days.";
        Mock::given(method("GET"))
            .and(path("/cic"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(body)))
            .expect(1)
            .mount(&server)
            .await;

        let registry = SourceRegistry::new(vec![source(&server, "CIC", "/cic", Duration::from_secs(2))]);
        let cache = PageCache::new(Duration::from_secs(60), 16);
        let fetcher = WebEvidenceFetcher::new(Arc::new(registry), Some(cache)).unwrap();

        let first = fetcher.gather("appeal", Category::Rti).await;
        let second = fetcher.gather("appeal", Category::Rti).await;

        assert_eq!(first.text, second.text);
        assert_eq!(second.sources, vec!["CIC"]);
    }
}
