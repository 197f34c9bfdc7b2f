//! Bot-access signature headers
//!
//! Some storefront platforms only serve their sitemaps to crawlers that
//! present a precomputed HTTP message signature. This module carries that
//! credential material and turns it into request headers. Signatures are
//! never computed or checked here: the values are transported verbatim and
//! the remote server decides whether they are valid.

use serde::Deserialize;
use std::fmt;

/// Header carrying the signature value
pub const SIGNATURE_HEADER: &str = "Signature";

/// Header carrying the signature input (covered components and parameters)
pub const SIGNATURE_INPUT_HEADER: &str = "Signature-Input";

/// Header identifying the signing agent
pub const SIGNATURE_AGENT_HEADER: &str = "Signature-Agent";

/// Precomputed bot-access credentials
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub signature: String,

    #[serde(rename = "signature-input")]
    pub signature_input: String,

    #[serde(rename = "signature-agent")]
    pub signature_agent: String,
}

impl Credentials {
    pub fn new(
        signature: impl Into<String>,
        signature_input: impl Into<String>,
        signature_agent: impl Into<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            signature_input: signature_input.into(),
            signature_agent: signature_agent.into(),
        }
    }
}

// Signatures end up in log files; only the agent is safe to print.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("signature", &"<redacted>")
            .field("signature_input", &"<redacted>")
            .field("signature_agent", &self.signature_agent)
            .finish()
    }
}

/// Builds the authentication headers attached to every outbound request
#[derive(Debug, Clone, Default)]
pub struct SignatureProvider {
    credentials: Option<Credentials>,
}

impl SignatureProvider {
    /// Creates a provider; `None` means requests go out unauthenticated
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self { credentials }
    }

    /// Returns true if credentials were supplied
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Returns the header name/value pairs to attach to every request
    ///
    /// With credentials this is always exactly three pairs in the order
    /// `Signature`, `Signature-Input`, `Signature-Agent`. Without credentials
    /// the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_scout::auth::{Credentials, SignatureProvider};
    ///
    /// let provider = SignatureProvider::new(Some(Credentials::new("sig", "input", "agent")));
    /// let headers = provider.headers();
    /// assert_eq!(headers[0], ("Signature", "sig".to_string()));
    ///
    /// assert!(SignatureProvider::new(None).headers().is_empty());
    /// ```
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match &self.credentials {
            Some(creds) => vec![
                (SIGNATURE_HEADER, creds.signature.clone()),
                (SIGNATURE_INPUT_HEADER, creds.signature_input.clone()),
                (SIGNATURE_AGENT_HEADER, creds.signature_agent.clone()),
            ],
            None => Vec::new(),
        }
    }
}
