//! CAPTCHA detection and external resolution

use scraper::{Html, Selector};
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use url::Url;

/// Case-insensitive markers that flag a page as a CAPTCHA wall
pub const CAPTCHA_KEYWORDS: &[&str] = &["captcha", "recaptcha", "verify"];

/// Returns true if the page looks like a CAPTCHA challenge
///
/// A page is flagged when the markup contains any of [`CAPTCHA_KEYWORDS`]
/// (case-insensitive), or when an `<img>` has "captcha" in its `src` or `alt`.
///
/// # Example
///
/// ```
/// use crawly::crawler::is_captcha_page;
///
/// assert!(is_captcha_page("<p>Please verify you are human, recaptcha</p>"));
/// assert!(!is_captcha_page("<p>Welcome</p>"));
/// ```
pub fn is_captcha_page(html: &str) -> bool {
    let lowered = html.to_lowercase();
    if CAPTCHA_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return true;
    }

    has_captcha_image(html)
}

fn has_captcha_image(html: &str) -> bool {
    let Ok(selector) = Selector::parse("img") else {
        return false;
    };

    let document = Html::parse_document(html);
    let found = document.select(&selector).any(|img| {
        ["src", "alt"].iter().any(|attr| {
            img.value()
                .attr(attr)
                .map_or(false, |value| value.to_lowercase().contains("captcha"))
        })
    });
    found
}

/// Waits for a CAPTCHA to be solved outside the crawler
#[allow(async_fn_in_trait)]
pub trait CaptchaResolver {
    /// Blocks this fetch until the challenge on `url` is reported solved
    ///
    /// Returns false when the wait gave up without a resolution.
    async fn wait_for_resolution(&self, url: &Url) -> bool;
}

/// Asks the operator on the terminal to solve the challenge
///
/// The operator solves the CAPTCHA in a visible browser and presses Enter.
/// The wait is bounded so unattended runs do not hang forever. One reader
/// owns stdin for the life of the resolver; lines typed while no wait is
/// active are discarded when the next wait starts.
#[derive(Debug)]
pub struct ConsoleResolver {
    timeout: Duration,
    lines: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl ConsoleResolver {
    /// Creates a resolver reading confirmations from stdin
    ///
    /// The stdin reader is started on the first wait.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            lines: Mutex::new(None),
        }
    }

    /// Creates a resolver reading confirmations from `lines`
    pub fn with_lines(timeout: Duration, lines: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            timeout,
            lines: Mutex::new(Some(lines)),
        }
    }
}

/// Forwards stdin lines to a channel from a plain thread
///
/// A blocked read on a plain thread never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read CAPTCHA confirmation: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

impl CaptchaResolver for ConsoleResolver {
    async fn wait_for_resolution(&self, url: &Url) -> bool {
        let mut guard = self.lines.lock().await;
        let lines = guard.get_or_insert_with(spawn_stdin_reader);

        // stale confirmations from an earlier, abandoned wait
        while lines.try_recv().is_ok() {}

        eprintln!("CAPTCHA detected on {}. Waiting for user to resolve it...", url);
        eprintln!(
            "Press Enter after solving CAPTCHA (giving up in {}s)...",
            self.timeout.as_secs()
        );

        match tokio::time::timeout(self.timeout, lines.recv()).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                tracing::warn!("CAPTCHA confirmation input closed");
                false
            }
            Err(_) => {
                tracing::warn!("Timed out waiting for CAPTCHA resolution on {}", url);
                false
            }
        }
    }
}
