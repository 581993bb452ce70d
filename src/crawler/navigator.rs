//! Anti-bot navigation
//!
//! Wraps a [`Fetcher`] with the behavior that gets pages past simple bot
//! walls:
//! - browser-like headers with a per-run User-Agent
//! - a Referer chain that follows the crawl (bootstrap referer first)
//! - randomized pacing before each navigation
//! - cookie-consent acceptance and CAPTCHA hand-off on the protected path
//!
//! Most pages need none of the slow handling, so [`AntiBotNavigator::fetch_page`]
//! tries the direct path first and only falls back to the protected path when
//! that fails.

use crate::config::NavigatorConfig;
use crate::crawler::captcha::{is_captcha_page, CaptchaResolver};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::headers::{build_headers, pick_user_agent};
use crate::{FetchError, FetchResult};
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Which path a single fetch attempt takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Navigate and read; any non-2xx answer is a failure
    Direct,
    /// Navigate, accept cookie consent, hand CAPTCHAs to the resolver
    Protected,
}

/// Markup of a fetched page plus what the navigator had to do to get it
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub html: String,
    pub consent_clicked: bool,
    pub captcha_detected: bool,
}

/// Result of the two-phase fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The direct path succeeded
    Direct(FetchedPage),
    /// The direct path failed and the protected retry succeeded
    Protected {
        page: FetchedPage,
        direct_error: FetchError,
    },
}

impl FetchOutcome {
    pub fn page(&self) -> &FetchedPage {
        match self {
            Self::Direct(page) | Self::Protected { page, .. } => page,
        }
    }

    pub fn into_html(self) -> String {
        match self {
            Self::Direct(page) | Self::Protected { page, .. } => page.html,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Protected { .. })
    }
}

/// Navigator state scoped to one crawl run
pub struct AntiBotNavigator<F, R> {
    fetcher: F,
    resolver: R,
    config: NavigatorConfig,
    user_agent: String,
    previous_url: Option<Url>,
}

impl<F: Fetcher, R: CaptchaResolver> AntiBotNavigator<F, R> {
    /// Creates a navigator with a User-Agent drawn from the configured pool
    pub fn new(fetcher: F, resolver: R, config: NavigatorConfig) -> Self {
        let user_agent = pick_user_agent(&config.user_agents);
        Self {
            fetcher,
            resolver,
            config,
            user_agent,
            previous_url: None,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Referer for the next request
    pub fn referer(&self) -> &str {
        self.previous_url
            .as_ref()
            .map(Url::as_str)
            .unwrap_or(self.config.bootstrap_referer.as_str())
    }

    /// Starts a new run: fresh User-Agent, bootstrap referer
    pub fn reset(&mut self) {
        self.user_agent = pick_user_agent(&self.config.user_agents);
        self.previous_url = None;
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Fetches a page, retrying once on the protected path
    ///
    /// Returns an error only when both attempts failed; the error is the one
    /// from the protected attempt.
    pub async fn fetch_page(&mut self, url: &Url) -> FetchResult<FetchOutcome> {
        match self.fetch(url, FetchPhase::Direct).await {
            Ok(page) => Ok(FetchOutcome::Direct(page)),
            Err(direct_error) => {
                tracing::debug!(
                    "Direct fetch of {} failed ({}), retrying with anti-bot handling",
                    url,
                    direct_error
                );
                let page = self.fetch(url, FetchPhase::Protected).await?;
                Ok(FetchOutcome::Protected { page, direct_error })
            }
        }
    }

    /// Performs a single fetch attempt on the given path
    pub async fn fetch(&mut self, url: &Url, phase: FetchPhase) -> FetchResult<FetchedPage> {
        let headers = build_headers(&self.config, &self.user_agent, self.referer())?;
        // the chain advances even when this navigation fails
        self.previous_url = Some(url.clone());

        self.pace().await;

        let navigation = self.fetcher.navigate(url, &headers).await?;

        if phase == FetchPhase::Direct {
            if !navigation.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: navigation.status,
                });
            }
            let html = self.fetcher.content().await?;
            return Ok(FetchedPage {
                html,
                ..Default::default()
            });
        }

        let consent_clicked = self.accept_consent(url).await;

        let mut html = self.fetcher.content().await?;
        let captcha_detected = is_captcha_page(&html);

        if captcha_detected {
            tracing::warn!("CAPTCHA detected on {}", url);
            if !self.config.interactive || !self.resolver.wait_for_resolution(url).await {
                return Err(FetchError::CaptchaUnresolved {
                    url: url.to_string(),
                });
            }
            self.fetcher.reload().await?;
            html = self.fetcher.content().await?;
        }

        Ok(FetchedPage {
            html,
            consent_clicked,
            captcha_detected,
        })
    }

    /// Tries to click the cookie-consent control; failure is not an error
    async fn accept_consent(&mut self, url: &Url) -> bool {
        let timeout = self.consent_timeout();
        match self
            .fetcher
            .click(&self.config.consent_selector, timeout)
            .await
        {
            Ok(true) => {
                tracing::debug!("Accepted cookie consent on {}", url);
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::debug!("Cookie consent on {} not handled: {}", url, e);
                false
            }
        }
    }

    fn consent_timeout(&self) -> Duration {
        let min = self.config.consent_wait_min_ms;
        let max = self.config.consent_wait_max_ms.max(min);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    async fn pace(&self) {
        if self.config.slow_mo_max_ms == 0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(0..=self.config.slow_mo_max_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}
