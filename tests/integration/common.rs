//! Shared helpers for the integration tests

use sitemap_scout::crawler::{CrawlSettings, FetchSettings};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a `<urlset>` document
pub fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("  <url><loc>{}</loc></url>\n", u))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

/// Builds a `<sitemapindex>` document
pub fn sitemap_index(refs: &[String]) -> String {
    let entries: String = refs
        .iter()
        .map(|u| format!("  <sitemap><loc>{}</loc></sitemap>\n", u))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        entries
    )
}

/// Serves `body` with status 200 for GET `route`
pub async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Fast settings: short timeout, no retries
pub fn fetch_settings() -> FetchSettings {
    FetchSettings {
        request_timeout: Duration::from_secs(5),
        max_retries: 0,
        retry_delay: Duration::ZERO,
        ..FetchSettings::default()
    }
}

pub fn crawl_settings(max_concurrent_fetches: usize) -> CrawlSettings {
    CrawlSettings {
        fetch: fetch_settings(),
        max_concurrent_fetches,
        extra_rules: Vec::new(),
    }
}
