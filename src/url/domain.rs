use url::Url;

/// Extracts the lowercase host from a URL string
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::extract_host;
///
/// assert_eq!(extract_host("https://Shop.Example.com/products/a"), Some("shop.example.com".to_string()));
/// assert_eq!(extract_host("/relative/path"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Builds a filesystem-friendly slug from a base URL
///
/// `https://www.shop.example.com/` becomes `shop_example_com`. Used to name
/// exported report files.
pub fn domain_slug(base_url: &str) -> String {
    let host = base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    let host = host.split('/').next().unwrap_or(host);

    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
