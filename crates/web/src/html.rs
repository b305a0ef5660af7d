use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Blocks kept per page.
pub const MAX_BLOCKS: usize = 50;
/// Characters kept per page after block extraction.
pub const MAX_CHARS_PER_SOURCE: usize = 3500;
/// Blocks at or below this length are navigation crumbs, buttons and the like.
const MIN_BLOCK_CHARS: usize = 40;

const CONTAINERS: &[&str] = &[
    "main",
    "article",
    "#content",
    "#main-content",
    ".content",
    ".main-content",
    ".node__content",
    "body",
];

const BLOCKS: &str = "p, li, h1, h2, h3, h4, td, dd";

const CHROME: &[&str] = &[
    "nav", "header", "footer", "aside", "form", "script", "style", "noscript", "button", "iframe",
];

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn inside_chrome(elem: &ElementRef<'_>) -> bool {
    elem.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| CHROME.contains(&e.name()))
    })
}

/// Strip markup from a portal page and keep its readable paragraphs, one per
/// line. Returns an empty string when nothing readable is found.
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = CONTAINERS.iter().find_map(|css| {
        selector(css).and_then(|sel| document.select(&sel).next())
    });
    let Some(root) = root else {
        return String::new();
    };
    let Some(block_sel) = selector(BLOCKS) else {
        return String::new();
    };

    let mut seen = HashSet::new();
    let mut blocks: Vec<String> = Vec::new();

    for elem in root.select(&block_sel) {
        if inside_chrome(&elem) {
            continue;
        }

        let text = compact_ws(&elem.text().collect::<Vec<_>>().join(" "));
        if text.chars().count() <= MIN_BLOCK_CHARS || text.starts_with("Skip to") {
            continue;
        }
        if !seen.insert(text.to_lowercase()) {
            continue;
        }

        blocks.push(text);
        if blocks.len() >= MAX_BLOCKS {
            break;
        }
    }

    let joined = blocks.join("\n");
    if joined.chars().count() > MAX_CHARS_PER_SOURCE {
        joined.chars().take(MAX_CHARS_PER_SOURCE).collect()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>RTI</title><style>p { color: red; }</style></head>
        <body>
          <header><p>Government of India official portal header banner text here</p></header>
          <nav><li>Home About Contact Sitemap Accessibility Statement Screen Reader</li></nav>
          <main>
            <h2>Short</h2>
            <p>The Right to Information Act mandates timely response to citizen requests for government information.</p>
            <ul><li>Applications can be filed online for all central public authorities.</li></ul>
            <p>Skip to main content of this page because it is long enough to pass the filter</p>
          </main>
          <footer><p>Copyright National Informatics Centre, all rights reserved, 2024 edition</p></footer>
        </body></html>
    "#;

    #[test]
    fn test_keeps_main_paragraphs_only() {
        let text = extract_readable_text(PAGE);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("The Right to Information Act"));
        assert!(lines[1].starts_with("Applications can be filed online"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("header banner"));
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><body><div><p>This paragraph lives directly in the body without any main container.</p></div></body></html>";
        let text = extract_readable_text(html);
        assert!(text.contains("directly in the body"));
    }

    #[test]
    fn test_blocked_page_yields_empty_text() {
        let html = "<html><body><p>Access denied</p></body></html>";
        assert_eq!(extract_readable_text(html), "");
    }

    #[test]
    fn test_output_is_capped() {
        let body: String = (0..20)
            .map(|i| format!("<p>{} {}</p>", "statutory text ".repeat(40), i))
            .collect();
        let html = format!("<html><body><main>{}</main></body></html>", body);
        let text = extract_readable_text(&html);
        assert_eq!(text.chars().count(), MAX_CHARS_PER_SOURCE);
    }
}
