use crate::common::{fast_config, product_extractor, product_page, RetryLog};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sumi_gather::crawler::{HttpFetcher, WorkerPool};
use sumi_gather::FetchConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a route that answers `status` `failures` times, then 200
async fn flaky_route(server: &MockServer, route: &str, status: u16, failures: u64, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("try later"))
        .up_to_n_times(failures)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_exactly_n_retries_before_success() {
    let mock_server = MockServer::start().await;
    flaky_route(&mock_server, "/flaky", 503, 3, product_page(&["Finally"])).await;

    let delay = Duration::from_millis(100);
    let config = fast_config(delay);
    let log = Arc::new(RetryLog::default());
    let url = format!("{}/flaky", mock_server.uri());

    let started = Instant::now();
    let harvest = WorkerPool::new(HttpFetcher::new(&config).unwrap(), product_extractor(), config)
        .with_reporter(log.clone())
        .run(&[url.clone()])
        .await
        .unwrap();

    assert!(started.elapsed() >= delay * 3);
    assert_eq!(requests_to(&mock_server, "/flaky").await, 4);

    let retries = log.retries.lock().unwrap();
    assert_eq!(retries.len(), 3);
    assert!(retries.iter().all(|(u, d)| *u == url && *d == delay));

    assert_eq!(harvest.stats.retries, 3);
    assert_eq!(harvest.stats.status_failures, 3);
    assert_eq!(harvest.results[&url][&1]["title"], Some("Finally".to_string()));
}

#[tokio::test]
async fn test_retried_url_keeps_only_successful_records() {
    let mock_server = MockServer::start().await;

    // The failing response still carries extractable markup
    Mock::given(method("GET"))
        .and(path("/partial"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(product_page(&["Stale1", "Stale2", "Stale3"])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/partial"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["Fresh"])))
        .mount(&mock_server)
        .await;

    let config = fast_config(Duration::from_millis(50));
    let url = format!("{}/partial", mock_server.uri());
    let harvest = WorkerPool::new(HttpFetcher::new(&config).unwrap(), product_extractor(), config)
        .run(&[url.clone()])
        .await
        .unwrap();

    let records = &harvest.results[&url];
    assert_eq!(records.len(), 1);
    assert_eq!(records[&1]["title"], Some("Fresh".to_string()));
}

#[tokio::test]
async fn test_one_slow_url_does_not_block_others() {
    let mock_server = MockServer::start().await;
    flaky_route(&mock_server, "/slow", 429, 2, product_page(&["Late"])).await;

    Mock::given(method("GET"))
        .and(path("/quick"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["Early"])))
        .mount(&mock_server)
        .await;

    let config = fast_config(Duration::from_millis(80));
    let urls = vec![
        format!("{}/slow", mock_server.uri()),
        format!("{}/quick", mock_server.uri()),
    ];

    let harvest = WorkerPool::new(HttpFetcher::new(&config).unwrap(), product_extractor(), config)
        .run(&urls)
        .await
        .unwrap();

    assert_eq!(harvest.results.len(), 2);
    assert_eq!(requests_to(&mock_server, "/quick").await, 1);
    assert_eq!(requests_to(&mock_server, "/slow").await, 3);
}

#[tokio::test]
async fn test_attempt_cap_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = FetchConfig {
        max_attempts: Some(3),
        ..fast_config(Duration::from_millis(20))
    };
    let url = format!("{}/down", mock_server.uri());
    let harvest = WorkerPool::new(HttpFetcher::new(&config).unwrap(), product_extractor(), config)
        .run(&[url.clone()])
        .await
        .unwrap();

    assert_eq!(requests_to(&mock_server, "/down").await, 3);
    assert_eq!(harvest.exhausted, vec![url.clone()]);
    assert!(!harvest.results.contains_key(&url));
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    let config = FetchConfig {
        max_attempts: Some(2),
        ..fast_config(Duration::from_millis(20))
    };
    let log = Arc::new(RetryLog::default());
    let url = "http://127.0.0.1:9/unreachable".to_string();

    let harvest = WorkerPool::new(HttpFetcher::new(&config).unwrap(), product_extractor(), config)
        .with_reporter(log.clone())
        .run(&[url.clone()])
        .await
        .unwrap();

    assert_eq!(log.retries.lock().unwrap().len(), 1);
    assert_eq!(harvest.stats.transport_failures, 2);
    assert_eq!(harvest.exhausted, vec![url]);
}
