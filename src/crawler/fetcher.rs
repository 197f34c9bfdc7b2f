//! Authenticated HTTP fetcher
//!
//! This module handles every HTTP request the crawler makes:
//! - Building one pooled client with the bot-access signature headers
//!   installed as default headers
//! - GET requests with a per-request timeout
//! - Status interpretation (only 200 counts as success)
//! - Bounded retry of transport failures

use crate::auth::SignatureProvider;
use crate::crawler::error::FetchError;
use crate::ScoutError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Default user agent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("SitemapScout/", env!("CARGO_PKG_VERSION"));

/// Knobs for the HTTP layer
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,

    /// Upper bound for one request, body included
    pub request_timeout: Duration,

    /// Extra attempts after a transport failure (HTTP status errors are
    /// never retried)
    pub max_retries: u32,

    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// A document returned with HTTP 200
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Builds an HTTP client carrying the signature headers on every request
///
/// Signature values are marked sensitive so they are not printed by the
/// client's debug output.
///
/// # Errors
///
/// * `ScoutError::InvalidHeader` - a credential value contains bytes that
///   are not allowed in an HTTP header
/// * `ScoutError::Http` - the TLS backend could not be initialized
pub fn build_http_client(
    settings: &FetchSettings,
    signatures: &SignatureProvider,
) -> Result<Client, ScoutError> {
    let mut headers = HeaderMap::new();
    for (name, value) in signatures.headers() {
        let mut header_value =
            HeaderValue::from_str(&value).map_err(|e| ScoutError::InvalidHeader {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        header_value.set_sensitive(true);
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScoutError::InvalidHeader {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        headers.insert(header_name, header_value);
    }

    let client = Client::builder()
        .user_agent(settings.user_agent.clone())
        .default_headers(headers)
        .timeout(settings.request_timeout)
        .connect_timeout(settings.request_timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Performs GET requests with signature headers, retries and status checks
#[derive(Debug, Clone)]
pub struct AuthenticatedFetcher {
    client: Client,
    settings: FetchSettings,
    authenticated: bool,
}

impl AuthenticatedFetcher {
    pub fn new(settings: FetchSettings, signatures: &SignatureProvider) -> Result<Self, ScoutError> {
        let client = build_http_client(&settings, signatures)?;
        Ok(Self {
            client,
            settings,
            authenticated: signatures.is_authenticated(),
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Returns true if requests carry signature headers
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fetches a URL, retrying transport failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Success |
    /// | Any other status | Immediate `HttpStatus` error |
    /// | Timeout / connect / reset / body read | Retry up to `max_retries` times, then `Transport` error |
    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let max_attempts = self.settings.max_retries + 1;
        let mut attempt = 1;

        loop {
            match self.fetch_once(url).await {
                Ok(document) => return Ok(document),
                Err(err) if err.is_transport() && attempt < max_attempts => {
                    tracing::warn!(
                        "Transport failure fetching {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        max_attempts,
                        err.detail
                    );
                    if !self.settings.retry_delay.is_zero() {
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!("Fetch of {} failed after {} attempt(s): {}", url, attempt, err);
                    return Err(err);
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, describe_transport_error(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, describe_transport_error(&e)))?;

        Ok(FetchedDocument {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
