use crate::common::{fast_config, product_extractor, product_page, CountingFetcher};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use sumi_gather::crawler::WorkerPool;
use sumi_gather::run_all;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_urls_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["Lamp", "Desk"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["Sofa", "Rug"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/a", mock_server.uri()),
        format!("{}/b", mock_server.uri()),
    ];

    let harvest = run_all(&urls, fast_config(Duration::from_secs(30)), product_extractor())
        .await
        .expect("harvest failed");

    assert_eq!(harvest.results.len(), 2);

    let a = &harvest.results[&urls[0]];
    assert_eq!(a.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(a[&1]["title"], Some("Lamp".to_string()));
    assert_eq!(a[&2]["title"], Some("Desk".to_string()));
    assert_eq!(a[&2]["price"], Some("9.99".to_string()));

    let b = &harvest.results[&urls[1]];
    assert_eq!(b[&1]["title"], Some("Sofa".to_string()));
    assert_eq!(b[&2]["title"], Some("Rug".to_string()));

    assert_eq!(harvest.stats.retries, 0);
    assert_eq!(harvest.stats.records, 4);
}

#[tokio::test]
async fn test_first_200_has_no_delay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["One"])))
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/fast", mock_server.uri())];
    let started = Instant::now();

    let harvest = run_all(&urls, fast_config(Duration::from_secs(30)), product_extractor())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(harvest.results.contains_key(&urls[0]));
}

#[tokio::test]
async fn test_malformed_element_is_isolated() {
    let mock_server = MockServer::start().await;

    let body = r#"<html><body>
        <div class="prod-content"><span class="title">First</span></div>
        <div class="prod-content"><span class="price">no title here</span></div>
        <div class="prod-content"><span class="title">Third</span></div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/mixed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/mixed", mock_server.uri())];
    let harvest = run_all(&urls, fast_config(Duration::from_secs(30)), product_extractor())
        .await
        .unwrap();

    let records = &harvest.results[&urls[0]];
    assert_eq!(records.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(records[&1]["title"], Some("First".to_string()));
    assert_eq!(records[&1]["price"], None);
    assert_eq!(records[&3]["title"], Some("Third".to_string()));
    assert_eq!(harvest.stats.succeeded, 1);
}

#[tokio::test]
async fn test_page_without_containers_still_gets_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/empty", mock_server.uri())];
    let harvest = run_all(&urls, fast_config(Duration::from_secs(30)), product_extractor())
        .await
        .unwrap();

    assert!(harvest.results[&urls[0]].is_empty());
}

#[tokio::test]
async fn test_sends_user_agent_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(&["X"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/ua", mock_server.uri())];
    let harvest = run_all(&urls, fast_config(Duration::from_millis(50)), product_extractor())
        .await
        .unwrap();

    assert_eq!(harvest.results[&urls[0]].len(), 1);
}

#[tokio::test]
async fn test_connection_limit_bounds_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page(&["Slow"]))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&mock_server)
        .await;

    let config = sumi_gather::FetchConfig {
        worker_count: 8,
        connection_limit: 2,
        ..fast_config(Duration::from_millis(50))
    };
    let fetcher = CountingFetcher::new(&config);
    let peak = fetcher.peak.clone();

    let urls: Vec<String> = (0..8)
        .map(|i| format!("{}/item/{}", mock_server.uri(), i))
        .collect();

    let harvest = WorkerPool::new(fetcher, product_extractor(), config)
        .run(&urls)
        .await
        .unwrap();

    assert_eq!(harvest.results.len(), 8);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_worker_count_bounds_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page(&["Slow"]))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&mock_server)
        .await;

    let config = sumi_gather::FetchConfig {
        worker_count: 3,
        connection_limit: 10,
        ..fast_config(Duration::from_millis(50))
    };
    let fetcher = CountingFetcher::new(&config);
    let peak = fetcher.peak.clone();

    let urls: Vec<String> = (0..9)
        .map(|i| format!("{}/item/{}", mock_server.uri(), i))
        .collect();

    WorkerPool::new(fetcher, product_extractor(), config)
        .run(&urls)
        .await
        .unwrap();

    assert!(peak.load(Ordering::SeqCst) <= 3);
}
