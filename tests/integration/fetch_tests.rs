//! Fetcher behavior against a mock server

use crate::common::fetch_settings;
use sitemap_scout::crawler::{AuthenticatedFetcher, FetchErrorKind, FetchSettings};
use sitemap_scout::{Credentials, SignatureProvider};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credentials() -> Credentials {
    Credentials::new(
        "sig1=:dGVzdC1zaWduYXR1cmU=:",
        "sig1=(\"@authority\");created=1700000000;keyid=\"test-key\"",
        "\"https://bot.example.com\"",
    )
}

#[tokio::test]
async fn test_fetch_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
        .mount(&server)
        .await;

    let fetcher = AuthenticatedFetcher::new(fetch_settings(), &SignatureProvider::new(None)).unwrap();
    let document = fetcher
        .fetch(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(document.status, 200);
    assert_eq!(document.body, "<urlset/>");
}

#[tokio::test]
async fn test_signature_headers_attached() {
    let server = MockServer::start().await;
    let credentials = test_credentials();

    // Only answers when all three headers carry the exact credential values
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("Signature", credentials.signature.as_str()))
        .and(header("Signature-Input", credentials.signature_input.as_str()))
        .and(header("Signature-Agent", credentials.signature_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
        .mount(&server)
        .await;

    let fetcher =
        AuthenticatedFetcher::new(fetch_settings(), &SignatureProvider::new(Some(credentials)))
            .unwrap();
    let result = fetcher.fetch(&format!("{}/sitemap.xml", server.uri())).await;

    assert!(result.is_ok(), "signed request was rejected: {:?}", result.err());
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_retries: 3,
        retry_delay: Duration::from_millis(10),
        ..fetch_settings()
    };
    let fetcher =
        AuthenticatedFetcher::new(settings, &SignatureProvider::new(Some(test_credentials())))
            .unwrap();

    let err = fetcher
        .fetch(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::HttpStatus);
    assert_eq!(err.status, Some(401));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_timeout_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<urlset/>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(200),
        max_retries: 1,
        retry_delay: Duration::from_millis(10),
        ..FetchSettings::default()
    };
    let fetcher = AuthenticatedFetcher::new(settings, &SignatureProvider::new(None)).unwrap();

    let err = fetcher
        .fetch(&format!("{}/slow.xml", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::Transport);
    assert_eq!(err.status, None);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    let fetcher = AuthenticatedFetcher::new(fetch_settings(), &SignatureProvider::new(None)).unwrap();
    let err = fetcher
        .fetch("http://127.0.0.1:1/sitemap.xml")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::Transport);
}
