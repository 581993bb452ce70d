//! Integration tests for the reqwest fetch layer and anti-bot navigation

use crawly::config::{NavigatorConfig, ProxyConfig};
use crawly::crawler::{AntiBotNavigator, ConsoleResolver, FetchOutcome, HttpFetcher};
use crawly::FetchError;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_navigator_config() -> NavigatorConfig {
    NavigatorConfig {
        user_agents: vec!["CrawlyTest/1.0".to_string()],
        consent_wait_min_ms: 2000,
        consent_wait_max_ms: 2000,
        slow_mo_max_ms: 0,
        request_timeout_secs: 5,
        interactive: false,
        ..NavigatorConfig::default()
    }
}

fn navigator() -> AntiBotNavigator<HttpFetcher, ConsoleResolver> {
    let config = test_navigator_config();
    let fetcher = HttpFetcher::new(&config, &ProxyConfig::default()).unwrap();
    let resolver = ConsoleResolver::new(Duration::ZERO);
    AntiBotNavigator::new(fetcher, resolver, config)
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_browser_headers_and_referer_chain() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/first"))
        .and(header("user-agent", "CrawlyTest/1.0"))
        .and(header("referer", "https://www.google.com/"))
        .respond_with(html("<p>first</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let first_url = format!("{}/first", base);
    Mock::given(method("GET"))
        .and(path("/second"))
        .and(header("referer", first_url.as_str()))
        .respond_with(html("<p>second</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut nav = navigator();
    let first = nav
        .fetch_page(&Url::parse(&first_url).unwrap())
        .await
        .unwrap();
    assert!(!first.is_protected());
    assert_eq!(first.into_html(), "<p>first</p>");

    let second = nav
        .fetch_page(&Url::parse(&format!("{}/second", base)).unwrap())
        .await
        .unwrap();
    assert_eq!(second.into_html(), "<p>second</p>");
}

#[tokio::test]
async fn test_consent_form_is_submitted_on_protected_path() {
    let mock_server = MockServer::start().await;

    // the page only shows content once the consent cookie is set
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("cookie", "consent=yes"))
        .respond_with(html("<p>Welcome back</p>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"<form action="/consent" method="post">
                 <button data-role="accept-consent" name="accept" value="1">Accept</button>
               </form>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/consent"))
        .respond_with(ResponseTemplate::new(204).insert_header("set-cookie", "consent=yes; Path=/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut nav = navigator();
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let outcome = nav.fetch_page(&seed).await.unwrap();

    match outcome {
        FetchOutcome::Protected { page, direct_error } => {
            assert!(page.consent_clicked);
            assert_eq!(page.html, "<p>Welcome back</p>");
            assert!(matches!(direct_error, FetchError::Status { status: 403, .. }));
        }
        other => panic!("expected protected outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_captcha_wall_is_unresolved_when_not_interactive() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(r#"<div class="g-recaptcha"></div><p>Verify you are human</p>"#),
        )
        .mount(&mock_server)
        .await;

    let mut nav = navigator();
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let err = nav.fetch_page(&seed).await.unwrap_err();

    assert!(matches!(err, FetchError::CaptchaUnresolved { .. }));
}

#[tokio::test]
async fn test_protected_path_accepts_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<p>Not here</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut nav = navigator();
    let url = Url::parse(&format!("{}/gone", mock_server.uri())).unwrap();
    let outcome = nav.fetch_page(&url).await.unwrap();

    assert!(outcome.is_protected());
    assert!(!outcome.page().consent_clicked);
    assert_eq!(outcome.into_html(), "<p>Not here</p>");
}

#[tokio::test]
async fn test_connection_failure() {
    let mut nav = navigator();
    // nothing listens on port 1
    let url = Url::parse("http://127.0.0.1:1/").unwrap();
    let err = nav.fetch_page(&url).await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Http { .. } | FetchError::Timeout { .. }
    ));
}
