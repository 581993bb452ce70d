//! HTML parser for extracting page text and links
//!
//! This module turns raw markup into the two things the crawler keeps:
//! - the visible page text, whitespace-collapsed
//! - the ordered set of absolute, crawlable links (the LinkExtractor contract)

use crate::url::resolve_link;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text content is not page text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Page text, trimmed text nodes joined by single spaces
    pub text: String,

    /// Absolute http(s) non-asset links in anchor order, without duplicates
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts text and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved against `base_url`
///
/// **Exclude:**
/// - links whose scheme is not http/https after resolution
/// - links whose path ends in `.jpg`, `.png`, `.css`, `.js`, `.svg`
/// - repeats of a link already seen on the same page
///
/// # Example
///
/// ```
/// use crawly::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hello</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.text, "Hello Link");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let text = extract_text(&document);
    let links = match extract_links_from(&document, base_url) {
        Ok(links) => links,
        Err(e) => {
            tracing::debug!("Failed to extract links from {}: {}", base_url, e);
            Vec::new()
        }
    };

    ParsedPage { text, links }
}

/// Resolves every anchor on the page into an absolute crawlable URL
///
/// Re-extracting from the same `(base_url, html)` pair always yields the
/// same list.
pub fn extract_links(base_url: &Url, html: &str) -> Vec<Url> {
    parse_html(html, base_url).links
}

fn extract_links_from(document: &Html, base_url: &Url) -> Result<Vec<Url>, String> {
    let selector = Selector::parse("a[href]").map_err(|e| format!("{:?}", e))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.as_str().to_string()) {
                links.push(absolute_url);
            }
        }
    }

    Ok(links)
}

/// Collects the page text
fn extract_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| NON_TEXT_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
