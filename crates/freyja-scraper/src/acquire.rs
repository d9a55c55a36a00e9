//! Direct-then-proxy page acquisition.

use std::time::Duration;

use reqwest::{header, Client};

use crate::error::ScraperError;
use crate::normalize::html_to_text;
use crate::types::{AcquiredContent, AcquisitionSource, AttemptFailure, AttemptOutcome};

/// Proxy bodies at or under this many characters are treated as error pages.
pub const MIN_PROXY_BODY_CHARS: usize = 50;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7";

/// Fetches page content for brand extraction.
///
/// Tries the target site directly with a desktop-browser header set and only
/// falls back to the readability proxy once the direct attempt has failed.
/// Neither step is retried.
#[derive(Debug)]
pub struct ContentAcquirer {
    client: Client,
    proxy_base_url: String,
    direct_timeout: Duration,
}

impl ContentAcquirer {
    /// Creates an acquirer using `proxy_base_url` for the fallback step.
    ///
    /// Only the direct fetch carries a request timeout; the proxy call relies
    /// on the transport defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(proxy_base_url: &str, direct_timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, proxy_base_url, direct_timeout))
    }

    /// Uses an existing HTTP client, sharing its connection pool.
    #[must_use]
    pub fn with_client(client: Client, proxy_base_url: &str, direct_timeout: Duration) -> Self {
        Self {
            client,
            proxy_base_url: proxy_base_url.trim_end_matches('/').to_owned(),
            direct_timeout,
        }
    }

    /// Acquires content for `url`, preferring the direct fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Unreachable`] when both the direct fetch and
    /// the proxy fallback fail.
    pub async fn acquire(&self, url: &str) -> Result<AcquiredContent, ScraperError> {
        match self.fetch_direct(url).await {
            AttemptOutcome::Success(html) => {
                tracing::info!(url, bytes = html.len(), "direct fetch succeeded");
                let cleaned_text = html_to_text(&html);
                return Ok(AcquiredContent {
                    source: AcquisitionSource::Direct,
                    raw: html,
                    cleaned_text,
                });
            }
            AttemptOutcome::Failed(reason) => {
                tracing::warn!(url, %reason, "direct fetch failed; falling back to readability proxy");
            }
        }

        match self.fetch_via_proxy(url).await {
            AttemptOutcome::Success(text) => {
                tracing::info!(url, chars = text.chars().count(), "proxy fetch succeeded");
                Ok(AcquiredContent {
                    source: AcquisitionSource::ProxyFallback,
                    cleaned_text: text.clone(),
                    raw: text,
                })
            }
            AttemptOutcome::Failed(reason) => {
                tracing::error!(url, %reason, "proxy fetch failed; site unreachable");
                Err(ScraperError::Unreachable {
                    url: url.to_owned(),
                })
            }
        }
    }

    /// Single direct GET with browser-like headers and the direct timeout.
    ///
    /// A blank 2xx body counts as a failure so the proxy still gets a turn.
    pub async fn fetch_direct(&self, url: &str) -> AttemptOutcome {
        let request = self
            .client
            .get(url)
            .timeout(self.direct_timeout)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::ACCEPT, BROWSER_ACCEPT)
            .header(header::ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header(header::UPGRADE_INSECURE_REQUESTS, "1");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failed(classify(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return AttemptOutcome::Failed(AttemptFailure::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) if body.trim().is_empty() => {
                AttemptOutcome::Failed(AttemptFailure::TooShort { len: 0 })
            }
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) if e.is_timeout() => AttemptOutcome::Failed(AttemptFailure::Timeout),
            Err(e) => AttemptOutcome::Failed(AttemptFailure::Body(e.to_string())),
        }
    }

    /// Single GET through the readability proxy.
    pub async fn fetch_via_proxy(&self, url: &str) -> AttemptOutcome {
        let response = match self.client.get(self.proxy_url(url)).send().await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failed(classify(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return AttemptOutcome::Failed(AttemptFailure::Status(status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return AttemptOutcome::Failed(AttemptFailure::Body(e.to_string())),
        };

        let len = body.chars().count();
        if len <= MIN_PROXY_BODY_CHARS {
            return AttemptOutcome::Failed(AttemptFailure::TooShort { len });
        }
        AttemptOutcome::Success(body)
    }

    /// Proxy endpoint for `url`: the target is appended as a path suffix.
    #[must_use]
    pub fn proxy_url(&self, url: &str) -> String {
        format!("{}/{url}", self.proxy_base_url)
    }
}

fn classify(error: &reqwest::Error) -> AttemptFailure {
    if error.is_timeout() {
        AttemptFailure::Timeout
    } else {
        AttemptFailure::Network(error.to_string())
    }
}
