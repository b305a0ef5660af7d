use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use corpus::Category;
use query::select_origin;
use web::{EvidenceProvider, SourceRegistry, WebEvidenceFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Government Portal Probe ===\n");

    let registry = match std::env::var("NYAYA_SOURCES_FILE") {
        Ok(path) => SourceRegistry::from_json_file(Path::new(&path)).await?,
        Err(_) => SourceRegistry::government_portals(),
    };
    let fetcher = WebEvidenceFetcher::new(Arc::new(registry), None)?;

    for category in Category::ALL {
        let evidence = fetcher.gather(category.label(), category).await;
        let origin = select_origin(&evidence);

        println!("📂 {} -> {} ({} chars)", category, origin.label(), evidence.char_len());
        for fragment in &evidence.fragments {
            println!(
                "  {} {} [{:?}, {} chars]",
                if fragment.contributed() { "✓" } else { "✗" },
                fragment.source,
                fragment.outcome,
                fragment.text.chars().count()
            );
        }
        println!();
    }

    Ok(())
}
