use url::Url;

/// Path suffixes that mark a link as a static asset rather than a page
pub const STATIC_ASSET_EXTENSIONS: &[&str] = &[".jpg", ".png", ".css", ".js", ".svg"];

/// Returns true for http and https URLs
pub fn is_crawlable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Returns true if the URL path ends in a known static-asset extension
pub fn is_static_asset(url: &Url) -> bool {
    let path = url.path();
    STATIC_ASSET_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}

/// Resolves an anchor href against the page URL
///
/// Returns None if the link should not become an edge:
/// - empty or unparseable hrefs
/// - non-HTTP(S) URLs after resolution (javascript:, mailto:, tel:, data:, ...)
/// - static assets
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    if !is_crawlable_scheme(&absolute) || is_static_asset(&absolute) {
        return None;
    }

    Some(absolute)
}
