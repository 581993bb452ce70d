use crate::ConfigError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Accepts `http(s)://host.tld...` and the scheme-less `www.host.tld...` form
const SEED_PATTERN: &str = r"^(?:https?://(?:www\.)?[a-zA-Z0-9][a-zA-Z0-9-]+[a-zA-Z0-9]\.\S{2,}|www\.[a-zA-Z0-9][a-zA-Z0-9-]+[a-zA-Z0-9]\.\S{2,}|https?://(?:www\.)?[a-zA-Z0-9]+\.\S{2,}|www\.[a-zA-Z0-9]+\.\S{2,})$";

fn seed_regex() -> &'static Regex {
    static SEED_REGEX: OnceLock<Regex> = OnceLock::new();
    SEED_REGEX.get_or_init(|| Regex::new(SEED_PATTERN).expect("seed pattern is a valid regex"))
}

/// Returns true if the input looks like a URL the crawler can start from
///
/// A host starting with "www" must continue with a dot, so
/// `https://wwwexample.com` is rejected.
pub fn is_url_shaped(input: &str) -> bool {
    seed_regex().is_match(input) && !has_glued_www(input)
}

fn has_glued_www(input: &str) -> bool {
    let host = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);
    host.starts_with("www") && !host.starts_with("www.")
}

/// Validates a seed URL and turns it into an absolute http(s) URL
///
/// A scheme-less `www.` seed is completed with `https://`.
///
/// # Examples
///
/// ```
/// use crawly::url::parse_seed;
///
/// let url = parse_seed("www.example.com/start").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.com/start");
/// ```
pub fn parse_seed(input: &str) -> Result<Url, ConfigError> {
    let input = input.trim();
    if !is_url_shaped(input) {
        return Err(ConfigError::InvalidUrl(input.to_string()));
    }

    let absolute = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    Url::parse(&absolute).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", input, e)))
}
