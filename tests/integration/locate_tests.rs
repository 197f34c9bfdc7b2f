//! Sitemap location probing

use crate::common::{fetch_settings, mount_xml, sitemap_index, urlset};
use sitemap_scout::crawler::{
    AuthenticatedFetcher, DocumentKind, ParsedDocument, SitemapLocator, CANDIDATE_PATHS,
};
use sitemap_scout::SignatureProvider;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn locator() -> SitemapLocator {
    let fetcher = AuthenticatedFetcher::new(fetch_settings(), &SignatureProvider::new(None)).unwrap();
    SitemapLocator::new(fetcher)
}

#[tokio::test]
async fn test_locate_first_candidate() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(&server, "/sitemap.xml", urlset(&[format!("{}/products/a", base)])).await;

    let located = locator().locate_document(&base).await.unwrap();

    assert_eq!(located.reference.as_str(), format!("{}/sitemap.xml", base));
    assert!(located.attempts.is_empty());
    assert_eq!(
        located.document,
        ParsedDocument::UrlSet {
            urls: vec![format!("{}/products/a", base)]
        }
    );
}

#[tokio::test]
async fn test_locate_skips_missing_and_soft_404() {
    let server = MockServer::start().await;
    let base = server.uri();

    // /sitemap.xml is unmounted (404); /sitemap_index.xml is an HTML page
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html><html><body>Page not found</body></html>"),
        )
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/sitemaps/sitemap.xml",
        sitemap_index(&[format!("{}/sitemaps/products.xml", base)]),
    )
    .await;

    let located = locator().locate_document(&format!("{}/", base)).await.unwrap();

    assert_eq!(
        located.reference.as_str(),
        format!("{}/sitemaps/sitemap.xml", base)
    );
    assert_eq!(located.document.kind(), DocumentKind::SitemapIndex);
    assert_eq!(located.attempts.len(), 2);
    assert_eq!(located.attempts[0].reason, "HTTP 404");
    assert!(located.attempts[1].reason.contains("html"));
}

#[tokio::test]
async fn test_not_found_lists_every_candidate() {
    let server = MockServer::start().await;
    let base = server.uri();

    let err = locator().locate(&base).await.unwrap_err();

    assert_eq!(err.base_url, base);
    assert_eq!(err.attempts.len(), CANDIDATE_PATHS.len());
    for (attempt, candidate) in err.attempts.iter().zip(CANDIDATE_PATHS) {
        assert_eq!(attempt.url, format!("{}{}", base, candidate));
        assert_eq!(attempt.reason, "HTTP 404");
    }
}

#[tokio::test]
async fn test_locate_returns_reference() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(&server, "/sitemap", urlset(&[])).await;

    let reference = locator().locate(&base).await.unwrap();
    assert_eq!(reference.as_str(), format!("{}/sitemap", base));
}
