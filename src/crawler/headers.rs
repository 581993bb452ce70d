use crate::config::NavigatorConfig;
use crate::FetchError;
use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};

/// Picks one User-Agent from the pool
///
/// Falls back to the built-in pool when the configured one is empty.
pub fn pick_user_agent(pool: &[String]) -> String {
    let mut rng = rand::thread_rng();
    match pool.choose(&mut rng) {
        Some(agent) => agent.clone(),
        None => crate::config::DEFAULT_USER_AGENTS
            .choose(&mut rng)
            .map(|agent| agent.to_string())
            .unwrap_or_default(),
    }
}

/// Build browser-like request headers
///
/// # Arguments
///
/// * `config` - Navigator settings (Accept, Accept-Language)
/// * `user_agent` - User-Agent picked for this run
/// * `referer` - The previously visited URL, or the bootstrap referer
pub fn build_headers(
    config: &NavigatorConfig,
    user_agent: &str,
    referer: &str,
) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, header_value(user_agent)?);
    headers.insert(ACCEPT, header_value(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
    headers.insert(REFERER, header_value(referer)?);
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::Header(format!("{:?}: {}", value, e)))
}
