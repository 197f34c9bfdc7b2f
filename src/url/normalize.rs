use url::Url;

/// Normalizes a URL for duplicate detection
///
/// Everything from the first `?` or `#` onward is dropped. The remainder is
/// kept byte-for-byte: no case folding, no trailing-slash or host rewriting,
/// so two URLs only collapse together when they differ solely in query string
/// or fragment.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::normalize_for_dedup;
///
/// assert_eq!(
///     normalize_for_dedup("https://shop.example.com/products/a?variant=1"),
///     "https://shop.example.com/products/a"
/// );
/// assert_eq!(normalize_for_dedup("/Products/A#reviews"), "/Products/A");
/// ```
pub fn normalize_for_dedup(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Extracts the path component of a URL
///
/// Absolute URLs are parsed with the `url` crate. Anything that does not
/// parse (relative references, junk from malformed sitemaps) falls back to a
/// string heuristic, so this never fails: the worst case is returning the
/// input minus its query and fragment.
pub fn extract_path(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.path().to_string();
    }

    let trimmed = normalize_for_dedup(url);
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));

    match rest {
        Some(rest) => match rest.find('/') {
            Some(slash) => rest[slash..].to_string(),
            None => "/".to_string(),
        },
        None => trimmed.to_string(),
    }
}

/// Returns the last non-empty path segment (the "handle") of a URL
///
/// `https://shop.example.com/products/red-shoe-es1234/` yields
/// `red-shoe-es1234`. The root path yields `None`.
pub fn last_path_segment(url: &str) -> Option<String> {
    extract_path(url)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

/// Resolves a `<loc>` value found in a sitemap index against its parent
///
/// Absolute references are returned unchanged (modulo `url` serialization);
/// relative ones are joined onto the parent sitemap URL. Returns `None` for
/// values that cannot be turned into an HTTP(S) URL.
pub fn resolve_reference(parent: &str, loc: &str) -> Option<String> {
    let loc = loc.trim();
    if loc.is_empty() {
        return None;
    }

    let resolved = match Url::parse(loc) {
        Ok(absolute) => absolute,
        Err(::url::ParseError::RelativeUrlWithoutBase) => Url::parse(parent).ok()?.join(loc).ok()?,
        Err(_) => return None,
    };

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Some(resolved.to_string())
    } else {
        None
    }
}

/// Joins a candidate path onto a base URL
///
/// Trailing slashes on the base are trimmed first so that
/// `https://example.com/` and `https://example.com` behave identically.
pub fn join_base(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
