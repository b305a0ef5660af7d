use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use corpus::Category;

/// Per-request budget for a single portal.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(6);

fn default_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_millis() as u64
}

/// A trusted information source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub topics: BTreeSet<Category>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Source {
    pub fn new(name: &str, url: &str, topics: &[Category]) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            topics: topics.iter().copied().collect(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn covers(&self, category: Category) -> bool {
        self.topics.contains(&category)
    }
}

/// Read-only table of sources, in citation order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// The official Indian government portals for the three supported areas.
    pub fn government_portals() -> Self {
        use Category::*;

        Self::new(vec![
            Source::new(
                "RTI Online Portal (DoPT)",
                "https://rtionline.gov.in/",
                &[Rti],
            ),
            Source::new(
                "Central Information Commission",
                "https://cic.gov.in/",
                &[Rti, DomesticViolence],
            ),
            Source::new(
                "Department of Justice - Right to Information",
                "https://doj.gov.in/right-to-information",
                &[Rti, Divorce],
            ),
            Source::new(
                "India Code - Right to Information Act 2005",
                "https://www.indiacode.nic.in/handle/123456789/1879",
                &[Rti],
            ),
            Source::new(
                "India Code - Protection of Women from Domestic Violence Act 2005",
                "https://www.indiacode.nic.in/handle/123456789/15436",
                &[DomesticViolence],
            ),
            Source::new(
                "National Legal Services Authority (NALSA)",
                "https://nalsa.gov.in/",
                &[DomesticViolence, Divorce],
            ),
            Source::new(
                "India Code - Hindu Marriage Act 1955",
                "https://www.indiacode.nic.in/handle/123456789/2055",
                &[Divorce],
            ),
        ])
    }

    /// Load a registry from a JSON array of sources.
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read source registry: {:?}", path))?;

        let sources: Vec<Source> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid source registry: {:?}", path))?;

        anyhow::ensure!(!sources.is_empty(), "Source registry {:?} is empty", path);
        Ok(Self::new(sources))
    }

    /// Apply one timeout to every source.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self::new(
            self.sources
                .into_iter()
                .map(|s| s.with_timeout(timeout))
                .collect(),
        )
    }

    pub fn all(&self) -> &[Source] {
        &self.sources
    }

    pub fn for_category(&self, category: Category) -> Vec<&Source> {
        self.sources.iter().filter(|s| s.covers(category)).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::government_portals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_topic_keeps_registry_order() {
        let registry = SourceRegistry::government_portals();
        let names: Vec<_> = registry
            .for_category(Category::Divorce)
            .iter()
            .map(|s| s.name.as_str())
            .collect();

        assert_eq!(
            names,
            vec![
                "Department of Justice - Right to Information",
                "National Legal Services Authority (NALSA)",
                "India Code - Hindu Marriage Act 1955",
            ]
        );
    }

    #[test]
    fn test_every_category_has_sources() {
        let registry = SourceRegistry::government_portals();
        for category in Category::ALL {
            assert!(!registry.for_category(category).is_empty());
        }
        assert_eq!(registry.for_category(Category::Rti).len(), 4);
    }

    #[test]
    fn test_default_timeout_is_six_seconds() {
        let registry = SourceRegistry::government_portals();
        assert!(registry.all().iter().all(|s| s.timeout() == Duration::from_secs(6)));

        let shortened = registry.with_timeout(Duration::from_millis(250));
        assert!(shortened.all().iter().all(|s| s.timeout_ms == 250));
    }

    #[test]
    fn test_source_json_defaults_timeout() {
        let json = r#"[{"name": "Portal", "url": "https://example.gov.in/", "topics": ["RTI", "Divorce"]}]"#;
        let sources: Vec<Source> = serde_json::from_str(json).unwrap();

        assert_eq!(sources[0].timeout(), DEFAULT_FETCH_TIMEOUT);
        assert!(sources[0].covers(Category::Divorce));
        assert!(!sources[0].covers(Category::DomesticViolence));
    }
}
