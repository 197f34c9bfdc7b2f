//! Full crawl sessions against a mock site

use crate::common::{crawl_settings, mount_xml, sitemap_index, urlset};
use sitemap_scout::classify::{Category, CategoryRule};
use sitemap_scout::crawler::{
    crawl, CollectingObserver, CrawlCoordinator, CrawlErrorKind, CrawlEvent, FetchErrorKind,
};
use sitemap_scout::state::CrawlPhase;
use sitemap_scout::{Config, Credentials, ScoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn coordinator(base: &str, concurrency: usize) -> (CrawlCoordinator, Arc<CollectingObserver>) {
    let observer = Arc::new(CollectingObserver::new());
    let coordinator = CrawlCoordinator::new(base, crawl_settings(concurrency), None)
        .with_observer(observer.clone());
    (coordinator, observer)
}

fn urls_of(result: &sitemap_scout::crawler::CrawlResult) -> Vec<String> {
    result
        .categorized
        .all_urls
        .iter()
        .map(|r| r.url.clone())
        .collect()
}

#[tokio::test]
async fn test_index_tree_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap_products_1.xml", base),
            format!("{}/sitemap_pages_1.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_products_1.xml",
        urlset(&[
            format!("{}/products/hat", base),
            format!("{}/products/scarf", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_pages_1.xml",
        urlset(&[format!("{}/pages/about-us", base), format!("{}/", base)]),
    )
    .await;

    let (mut coordinator, observer) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(
        urls_of(&result),
        vec![
            format!("{}/products/hat", base),
            format!("{}/products/scarf", base),
            format!("{}/pages/about-us", base),
            format!("{}/", base),
        ]
    );
    let visited: Vec<&str> = result.sitemaps_visited.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        visited,
        vec![
            format!("{}/sitemap.xml", base),
            format!("{}/sitemap_products_1.xml", base),
            format!("{}/sitemap_pages_1.xml", base),
        ]
    );

    assert_eq!(result.categorized.count(Category::Products), 2);
    assert_eq!(result.categorized.count(Category::Pages), 1);
    assert_eq!(result.categorized.count(Category::Home), 1);
    assert!(result.errors.is_empty());
    assert_eq!(
        result.categorized.urls(Category::Products)[0]
            .source_sitemap
            .as_str(),
        format!("{}/sitemap_products_1.xml", base)
    );

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(
        observer.phases(),
        vec![
            CrawlPhase::Locating,
            CrawlPhase::Fetching,
            CrawlPhase::Categorizing,
            CrawlPhase::Analyzing,
            CrawlPhase::Done,
        ]
    );
}

#[tokio::test]
async fn test_self_referencing_index_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/sitemap.xml", base)]),
    )
    .await;

    let (mut coordinator, observer) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(result.total_urls(), 0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, CrawlErrorKind::CycleSkipped);
    assert_eq!(result.sitemaps_visited.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    assert!(observer
        .events()
        .iter()
        .any(|e| matches!(e, CrawlEvent::SitemapSkipped { .. })));
}

#[tokio::test]
async fn test_shared_child_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/a.xml", base),
            format!("{}/b.xml", base),
        ]),
    )
    .await;
    mount_xml(&server, "/a.xml", sitemap_index(&[format!("{}/shared.xml", base)])).await;
    mount_xml(&server, "/b.xml", sitemap_index(&[format!("{}/shared.xml", base)])).await;
    mount_xml(&server, "/shared.xml", urlset(&[format!("{}/products/x", base)])).await;

    let (mut coordinator, _) = coordinator(&base, 1);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(urls_of(&result), vec![format!("{}/products/x", base)]);
    assert_eq!(result.sitemaps_visited.len(), 4);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, CrawlErrorKind::CycleSkipped);
}

#[tokio::test]
async fn test_duplicates_and_category_counts() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/products/a", base),
            format!("{}/products/a?variant=1", base),
            format!("{}/collections/x", base),
        ]),
    )
    .await;

    let (mut coordinator, _) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(result.total_urls(), 3);
    assert_eq!(result.categorized.count(Category::Products), 2);
    assert_eq!(result.categorized.count(Category::Collections), 1);
    assert_eq!(result.report.total_urls, 3);
    assert_eq!(
        result.report.duplicates.iter().cloned().collect::<Vec<_>>(),
        vec![format!("{}/products/a", base)]
    );
}

#[tokio::test]
async fn test_failed_child_is_recorded_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap_blogs_1.xml", base),
            format!("{}/sitemap_broken.xml", base),
            format!("{}/sitemap_products_1.xml", base),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_blogs_1.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(&server, "/sitemap_broken.xml", "<urlset><url><loc>".to_string()).await;
    mount_xml(
        &server,
        "/sitemap_products_1.xml",
        urlset(&[format!("{}/products/a", base)]),
    )
    .await;

    let (mut coordinator, observer) = coordinator(&base, 2);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(urls_of(&result), vec![format!("{}/products/a", base)]);
    assert_eq!(result.failed_sitemaps().len(), 2);
    assert!(!result.was_cancelled());

    let http = result
        .errors
        .iter()
        .find(|e| e.kind == CrawlErrorKind::Fetch(FetchErrorKind::HttpStatus))
        .unwrap();
    assert_eq!(
        http.sitemap.as_ref().unwrap().as_str(),
        format!("{}/sitemap_blogs_1.xml", base)
    );
    assert!(result.errors.iter().any(|e| e.kind == CrawlErrorKind::Parse));

    let failures = observer
        .events()
        .into_iter()
        .filter(|e| matches!(e, CrawlEvent::SitemapFailed { .. }))
        .count();
    assert_eq!(failures, 2);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    // The unparseable child was fetched, so it counts as visited; the 500 did not
    let visited: Vec<&str> = result.sitemaps_visited.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        visited,
        vec![
            format!("{}/sitemap.xml", base),
            format!("{}/sitemap_broken.xml", base),
            format!("{}/sitemap_products_1.xml", base),
        ]
    );
}

#[tokio::test]
async fn test_bounded_concurrency_keeps_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children: Vec<String> = (0..10)
        .map(|i| format!("{}/sitemap_products_{}.xml", base, i))
        .collect();
    mount_xml(&server, "/sitemap.xml", sitemap_index(&children)).await;

    for i in 0..10u64 {
        // Later children answer faster than earlier ones
        Mock::given(method("GET"))
            .and(path(format!("/sitemap_products_{}.xml", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(urlset(&[format!("{}/products/item-{}", base, i)]))
                    .set_delay(Duration::from_millis(10 * (10 - i))),
            )
            .mount(&server)
            .await;
    }

    let (mut coordinator, _) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    let expected: Vec<String> = (0..10)
        .map(|i| format!("{}/products/item-{}", base, i))
        .collect();
    assert_eq!(urls_of(&result), expected);
    assert_eq!(result.sitemaps_visited.len(), 11);
    assert!(result.errors.is_empty());
}

/// Answers after a fixed delay and records when each request arrived
struct TimedResponder {
    body: String,
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for TimedResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200)
            .set_body_string(self.body.clone())
            .set_delay(self.delay)
    }
}

#[tokio::test]
async fn test_in_flight_fetches_never_exceed_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    let delay = Duration::from_millis(300);
    let arrivals = Arc::new(Mutex::new(Vec::new()));

    let children: Vec<String> = (0..10)
        .map(|i| format!("{}/sitemap_products_{}.xml", base, i))
        .collect();
    mount_xml(&server, "/sitemap.xml", sitemap_index(&children)).await;

    for i in 0..10 {
        Mock::given(method("GET"))
            .and(path(format!("/sitemap_products_{}.xml", i)))
            .respond_with(TimedResponder {
                body: urlset(&[format!("{}/products/item-{}", base, i)]),
                delay,
                arrivals: arrivals.clone(),
            })
            .mount(&server)
            .await;
    }

    let (mut coordinator, _) = coordinator(&base, 4);
    let started = Instant::now();
    let result = coordinator.run(CancellationToken::new()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.total_urls(), 10);

    // A request is in flight from its arrival until its delayed response,
    // and a slot is only refilled after a response has been received
    let arrivals = arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 10);
    let peak = arrivals
        .iter()
        .map(|&at| {
            arrivals
                .iter()
                .filter(|&&other| other <= at && at < other + delay)
                .count()
        })
        .max()
        .unwrap();
    assert_eq!(peak, 4);

    // 10 children through 4 slots need at least 3 rounds
    assert!(elapsed >= delay * 3, "finished in {:?}", elapsed);
}

#[tokio::test]
async fn test_root_listing_itself_with_noncanonical_base() {
    let server = MockServer::start().await;
    let port = server.address().port();
    let canonical = format!("http://localhost:{}", port);
    let base = format!("http://LOCALHOST:{}", port);

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap.xml", canonical),
            "/a.xml".to_string(),
        ]),
    )
    .await;
    mount_xml(&server, "/a.xml", urlset(&[format!("{}/products/a", canonical)])).await;

    let (mut coordinator, _) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    let root_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/sitemap.xml")
        .count();
    assert_eq!(root_requests, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, CrawlErrorKind::CycleSkipped);

    let visited: Vec<&str> = result.sitemaps_visited.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        visited,
        vec![
            format!("{}/sitemap.xml", canonical),
            format!("{}/a.xml", canonical),
        ]
    );
    assert_eq!(result.total_urls(), 1);
}

#[tokio::test]
async fn test_relative_child_reference_resolved() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&["/sitemap_pages_1.xml".to_string()]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_pages_1.xml",
        urlset(&[format!("{}/pages/contact", base)]),
    )
    .await;

    let (mut coordinator, _) = coordinator(&base, 4);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(result.categorized.count(Category::Pages), 1);
    assert_eq!(
        result.sitemaps_visited[1].as_str(),
        format!("{}/sitemap_pages_1.xml", base)
    );
}

#[tokio::test]
async fn test_extra_rules_take_precedence() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/lookbook/products/spring", base)]),
    )
    .await;

    let mut settings = crawl_settings(4);
    settings.extra_rules = vec![CategoryRule::pattern(Category::Collections, "^/lookbook/").unwrap()];
    let mut coordinator = CrawlCoordinator::new(base.as_str(), settings, None);
    let result = coordinator.run(CancellationToken::new()).await.unwrap();

    assert_eq!(result.categorized.count(Category::Collections), 1);
    assert_eq!(result.categorized.count(Category::Products), 0);
}

#[tokio::test]
async fn test_no_sitemap_fails_session() {
    let server = MockServer::start().await;
    let base = server.uri();

    let (mut coordinator, observer) = coordinator(&base, 4);
    let err = coordinator.run(CancellationToken::new()).await.unwrap_err();

    match err {
        ScoutError::NotFound(not_found) => assert_eq!(not_found.attempts.len(), 5),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(coordinator.phase(), CrawlPhase::Failed);
    assert_eq!(
        observer.phases(),
        vec![CrawlPhase::Locating, CrawlPhase::Failed]
    );
}

#[tokio::test]
async fn test_cancel_while_fetching_keeps_partial_result() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap_fast.xml", base),
            format!("{}/sitemap_slow.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_fast.xml",
        urlset(&[format!("{}/products/fast", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&[format!("{}/products/slow", base)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            cancel.cancel();
        });
    }

    let (mut coordinator, observer) = coordinator(&base, 4);
    let result = tokio::time::timeout(Duration::from_secs(5), coordinator.run(cancel))
        .await
        .expect("cancelled crawl should return promptly")
        .unwrap();

    assert!(result.was_cancelled());
    assert_eq!(urls_of(&result), vec![format!("{}/products/fast", base)]);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        CrawlEvent::Cancelled {
            phase: CrawlPhase::Fetching,
            pending: 1
        }
    )));
}

#[tokio::test]
async fn test_signed_crawl_from_config() {
    let server = MockServer::start().await;
    let base = server.uri();
    let credentials = Credentials::new(
        "sig1=:c2lnbmVk:",
        "sig1=(\"@authority\");created=1700000000",
        "\"https://bot.example.com\"",
    );

    for (route, body) in [
        (
            "/sitemap.xml",
            sitemap_index(&[format!("{}/sitemap_products_1.xml", base)]),
        ),
        (
            "/sitemap_products_1.xml",
            urlset(&[format!("{}/products/signed-only", base)]),
        ),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Signature", credentials.signature.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }

    let toml = format!(
        r#"
[site]
base-url = "{}"

[credentials]
signature = "{}"
signature-input = '{}'
signature-agent = '{}'

[crawler]
max-concurrent-fetches = 2
max-retries = 0
"#,
        base, credentials.signature, credentials.signature_input, credentials.signature_agent
    );
    let config: Config = toml::from_str(&toml).unwrap();

    let result = crawl(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(
        urls_of(&result),
        vec![format!("{}/products/signed-only", base)]
    );
    assert!(result.errors.is_empty());
}
