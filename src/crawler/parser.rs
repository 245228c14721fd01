//! HTML parser for extracting links and resources
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags)
//! - Resources referenced by the page (from `<img src>` tags)

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Links found on the page (absolute URLs, document order, no duplicates)
    pub links: Vec<String>,

    /// Image sources found on the page (absolute URLs, document order, no duplicates)
    pub resources: Vec<String>,
}

/// Parses HTML content and extracts links and resources
///
/// # Extraction Rules
///
/// **Links:** `<a href="...">`, except
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - fragment-only hrefs (same page anchors)
///
/// **Resources:** `<img src="...">`
///
/// Everything is resolved against `base_url`; only http(s) URLs are kept.
///
/// # Example
///
/// ```no_run
/// use link_harvest::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a><img src="logo.png"></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// assert_eq!(parsed.resources, vec!["https://example.com/logo.png".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_links(&document, base_url),
        resources: extract_resources(&document, base_url),
    }
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Extracts image sources from the HTML document
fn extract_resources(document: &Html, base_url: &Url) -> Vec<String> {
    let mut resources = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            if let Some(absolute_url) = element
                .value()
                .attr("src")
                .and_then(|src| resolve_resource(src, base_url))
            {
                if seen.insert(absolute_url.clone()) {
                    resources.push(absolute_url);
                }
            }
        }
    }

    resources
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    resolve_resource(href, base_url)
}

/// Resolves a reference against the page URL, keeping http(s) results only
fn resolve_resource(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    // Skip special schemes
    if reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    match base_url.join(reference) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
