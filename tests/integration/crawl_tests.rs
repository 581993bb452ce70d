//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including the written artifacts.

use crawly::config::{Config, FailurePolicy, SearchMethod};
use crawly::crawler::crawl;
use crawly::CrawlyError;
use std::path::Path;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output_dir`
fn create_test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.max_time = 30;
    config.crawler.max_depth = 2;
    config.navigator.user_agents = vec!["CrawlyTest/1.0".to_string()];
    config.navigator.slow_mo_max_ms = 0;
    config.navigator.consent_wait_min_ms = 0;
    config.navigator.consent_wait_max_ms = 0;
    config.navigator.request_timeout_secs = 5;
    config.navigator.interactive = false;
    config.output.directory = output_dir.display().to_string();
    config
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Home links to page1, page2 and an image; page1 links back and to page2
async fn start_site() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title><script>var x = 1;</script></head><body>
            <h1>Welcome   home</h1>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/logo.png">Logo</a>
            <a href="mailto:someone@example.com">Mail</a>
            </body></html>"#,
            base
        ),
    )
    .await;

    mount_page(
        &server,
        "/page1",
        r#"<html><body><p>Page one</p><a href="/">Home</a><a href="page2">Two</a></body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        &server,
        "/page2",
        "<html><body><p>Page two</p></body></html>".to_string(),
    )
    .await;

    server
}

fn read_rows(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "URL");
    assert_eq!(&headers[1], "Content");
    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            (record[0].to_string(), record[1].to_string())
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_breadth_first() {
    let server = start_site().await;
    let base = server.uri();
    let output = tempfile::tempdir().unwrap();
    let config = create_test_config(output.path());

    let seed = Url::parse(&format!("{}/", base)).unwrap();
    let run = crawl(&config, &seed, None).await.unwrap();

    assert_eq!(run.report.stats.pages_fetched, 3);
    assert_eq!(run.report.stats.pages_failed, 0);
    assert_eq!(run.report.visited.len(), 3);

    // CSV: one row per page, in visiting order
    assert_eq!(
        run.artifacts.table,
        output.path().join(format!("{}.csv", run.run_id))
    );
    let rows = read_rows(&run.artifacts.table);
    let urls: Vec<&str> = rows.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
        ]
    );
    assert_eq!(rows[0].1, "Home Welcome home Page 1 Page 2 Logo Mail");
    assert!(!rows[0].1.contains("var x"));

    // Graph: 4 edges were recorded, so the visualization exists
    let graph = run.artifacts.graph.expect("graph should be written");
    let html = std::fs::read_to_string(graph).unwrap();
    assert!(html.contains(&format!("Interactive Visualization of {}", run.run_id)));
    assert!(html.contains(&format!("{}/page2", base)));
    assert!(!html.contains("logo.png"));
}

#[tokio::test]
async fn test_full_crawl_depth_first_respects_depth() {
    let server = start_site().await;
    let base = server.uri();
    let output = tempfile::tempdir().unwrap();
    let mut config = create_test_config(output.path());
    config.crawler.method = SearchMethod::DepthFirst;
    config.crawler.max_depth = 1;

    let seed = Url::parse(&format!("{}/", base)).unwrap();
    let run = crawl(&config, &seed, None).await.unwrap();

    let rows = read_rows(&run.artifacts.table);
    let urls: Vec<&str> = rows.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
        ]
    );
}

#[tokio::test]
async fn test_single_edge_writes_no_graph() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/only">Only</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/only", "<p>Leaf</p>".to_string()).await;

    let output = tempfile::tempdir().unwrap();
    let config = create_test_config(output.path());
    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let run = crawl(&config, &seed, None).await.unwrap();

    assert_eq!(run.report.stats.edges, 1);
    assert!(run.artifacts.graph.is_none());
    assert!(run.artifacts.table.exists());
}

#[tokio::test]
async fn test_unreachable_link_resilient_and_strict() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="http://127.0.0.1:1/down">Down</a><a href="/up">Up</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/up", "<p>Up</p>".to_string()).await;
    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();

    let output = tempfile::tempdir().unwrap();
    let config = create_test_config(output.path());
    let run = crawl(&config, &seed, None).await.unwrap();
    assert_eq!(run.report.stats.pages_fetched, 2);
    assert_eq!(run.report.stats.pages_failed, 1);
    assert_eq!(read_rows(&run.artifacts.table).len(), 2);

    let strict_output = tempfile::tempdir().unwrap();
    let mut strict = create_test_config(strict_output.path());
    strict.crawler.failure_policy = FailurePolicy::Strict;
    let err = crawl(&strict, &seed, None).await.unwrap_err();

    match err {
        CrawlyError::Aborted { url, .. } => assert_eq!(url, "http://127.0.0.1:1/down"),
        other => panic!("expected abort, got {:?}", other),
    }
    // aborted runs write nothing
    assert_eq!(std::fs::read_dir(strict_output.path()).unwrap().count(), 0);
}
