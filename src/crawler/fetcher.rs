//! Page fetching
//!
//! This module defines the navigation contract the crawler core depends on
//! and its reqwest implementation:
//! - navigating to a URL with per-request headers
//! - reading the current document
//! - activating a control (cookie consent) on the current document
//! - reloading after an out-of-band CAPTCHA resolution

use crate::config::{NavigatorConfig, ProxyConfig};
use crate::{FetchError, FetchResult};
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, Method, Proxy};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Outcome of a navigation
#[derive(Debug, Clone)]
pub struct Navigation {
    /// HTTP status code of the final response
    pub status: u16,

    /// Final URL after redirects
    pub final_url: Url,
}

impl Navigation {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The page-loading capability the crawler drives
///
/// One fetcher holds at most one loaded document at a time, the way a
/// single browser tab does. Implementations may be a plain HTTP client or a
/// headless browser.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Loads `url` with the given request headers, replacing the current document
    async fn navigate(&mut self, url: &Url, headers: &HeaderMap) -> FetchResult<Navigation>;

    /// Returns the markup of the current document
    async fn content(&mut self) -> FetchResult<String>;

    /// Activates the first element matching `selector`
    ///
    /// Returns Ok(false) when no such element exists within `timeout`.
    async fn click(&mut self, selector: &str, timeout: Duration) -> FetchResult<bool>;

    /// Loads the current URL again with the same headers
    async fn reload(&mut self) -> FetchResult<Navigation>;
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps a cookie jar for the whole run so consent cookies are
/// sent with every later request.
///
/// # Example
///
/// ```no_run
/// use crawly::config::{NavigatorConfig, ProxyConfig};
/// use crawly::crawler::build_http_client;
///
/// let client = build_http_client(&NavigatorConfig::default(), &ProxyConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    config: &NavigatorConfig,
    proxy: &ProxyConfig,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .cookie_store(true)
        .gzip(true)
        .brotli(true);

    if let Some(server) = &proxy.server {
        let mut upstream = Proxy::all(server.as_str())?;
        if let Some(username) = &proxy.username {
            upstream = upstream.basic_auth(username, proxy.password.as_deref().unwrap_or(""));
        }
        builder = builder.proxy(upstream);
    }

    builder.build()
}

/// Document currently held by the fetcher
#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    headers: HeaderMap,
    navigation: Navigation,
    body: String,
}

/// Fetcher backed by a reqwest client
pub struct HttpFetcher {
    client: Client,
    current: Option<LoadedPage>,
}

impl HttpFetcher {
    /// Creates a fetcher from navigator and proxy settings
    pub fn new(config: &NavigatorConfig, proxy: &ProxyConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config, proxy)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        headers: &HeaderMap,
        form: Option<&[(String, String)]>,
    ) -> FetchResult<LoadedPage> {
        let mut request = self
            .client
            .request(method, url.clone())
            .headers(headers.clone());
        if let Some(fields) = form {
            request = request.form(fields);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let navigation = Navigation {
            status: response.status().as_u16(),
            final_url: response.url().clone(),
        };

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        Ok(LoadedPage {
            url: url.clone(),
            headers: headers.clone(),
            navigation,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn navigate(&mut self, url: &Url, headers: &HeaderMap) -> FetchResult<Navigation> {
        tracing::trace!("GET {}", url);
        let page = self.send(Method::GET, url, headers, None).await?;
        let navigation = page.navigation.clone();
        self.current = Some(page);
        Ok(navigation)
    }

    async fn content(&mut self) -> FetchResult<String> {
        self.current
            .as_ref()
            .map(|page| page.body.clone())
            .ok_or(FetchError::NoPage)
    }

    /// Submits the form that owns the matching control
    ///
    /// Plain HTTP has no script engine, so a control is only actionable when
    /// it belongs to a `<form>`. The form is submitted (so any cookies it
    /// sets land in the jar) and the current page is loaded again.
    async fn click(&mut self, selector: &str, timeout: Duration) -> FetchResult<bool> {
        let Some(page) = self.current.clone() else {
            return Err(FetchError::NoPage);
        };

        let Some(submission) = find_form_submission(&page.body, &page.navigation.final_url, selector)
        else {
            return Ok(false);
        };

        tracing::debug!(
            "Submitting consent form {} {} from {}",
            submission.method,
            submission.action,
            page.url
        );

        let submit = async {
            let form = (submission.method == Method::POST).then_some(submission.fields.as_slice());
            let mut action = submission.action.clone();
            if submission.method == Method::GET && !submission.fields.is_empty() {
                action
                    .query_pairs_mut()
                    .extend_pairs(submission.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            self.send(submission.method.clone(), &action, &page.headers, form)
                .await?;
            self.send(Method::GET, &page.url, &page.headers, None).await
        };

        let outcome = tokio::time::timeout(timeout, submit).await;
        match outcome {
            Ok(Ok(reloaded)) => {
                self.current = Some(reloaded);
                Ok(true)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout {
                url: submission.action.to_string(),
            }),
        }
    }

    async fn reload(&mut self) -> FetchResult<Navigation> {
        let Some(page) = self.current.as_ref() else {
            return Err(FetchError::NoPage);
        };
        let (url, headers) = (page.url.clone(), page.headers.clone());
        self.navigate(&url, &headers).await
    }
}

/// A form submission derived from a control on the page
#[derive(Debug, Clone)]
struct FormSubmission {
    method: Method,
    action: Url,
    fields: Vec<(String, String)>,
}

/// Finds the form owning the first element matching `selector`
fn find_form_submission(html: &str, page_url: &Url, selector: &str) -> Option<FormSubmission> {
    let selector = Selector::parse(selector).ok()?;
    let document = Html::parse_document(html);
    let control = document.select(&selector).next()?;

    let form = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "form")?;

    let action = match form.value().attr("action").map(str::trim) {
        Some(action) if !action.is_empty() => page_url.join(action).ok()?,
        _ => page_url.clone(),
    };

    let method = match form.value().attr("method") {
        Some(m) if m.eq_ignore_ascii_case("post") => Method::POST,
        _ => Method::GET,
    };

    let mut fields = Vec::new();
    if let Ok(inputs) = Selector::parse("input[name]") {
        for input in form.select(&inputs) {
            let kind = input.value().attr("type").unwrap_or("text");
            if kind.eq_ignore_ascii_case("submit") || kind.eq_ignore_ascii_case("button") {
                continue;
            }
            if let Some(name) = input.value().attr("name") {
                let value = input.value().attr("value").unwrap_or_default();
                fields.push((name.to_string(), value.to_string()));
            }
        }
    }

    if let Some(name) = control.value().attr("name") {
        let value = control.value().attr("value").unwrap_or_default();
        fields.push((name.to_string(), value.to_string()));
    }

    Some(FormSubmission {
        method,
        action,
        fields,
    })
}
