// # HTTP IP Source
//
// This crate resolves the machine's public IP address by asking an external
// "what is my IP" service over plain HTTP.
//
// ## Architecture
//
// Each configured URL is fetched in order; the body is trimmed and parsed as
// an IPv4 or IPv6 address. The first URL that answers with a valid address
// wins. When every URL fails the lookup reports `Error::PublicIp`, which the
// daemon treats as fatal for the pass.

use homeddns_core::traits::IpSource;
use homeddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default public IP service
pub const DEFAULT_IP_URL: &str = "http://ifconfig.io/ip";

/// Timeout for a single lookup request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP lookup
#[derive(Debug)]
pub struct HttpIpSource {
    /// URLs to try, in order
    urls: Vec<String>,

    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source that asks a single URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::from_urls(vec![url.into()])
    }

    /// Create a source that tries each URL in order until one answers
    pub fn from_urls(urls: Vec<String>) -> Result<Self> {
        if urls.is_empty() {
            return Err(Error::config("At least one public IP URL is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { urls, client })
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Fetch the current IP from one service
    async fn fetch_ip(&self, url: &str) -> std::result::Result<IpAddr, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {}", e))?;

        let ip_text = ip_text.trim();
        ip_text
            .parse()
            .map_err(|_| format!("invalid IP address: {:?}", ip_text))
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self {
            urls: vec![DEFAULT_IP_URL.to_string()],
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let mut failures = Vec::with_capacity(self.urls.len());

        for url in &self.urls {
            match self.fetch_ip(url).await {
                Ok(ip) => {
                    tracing::info!("Found public IP {} (via {})", ip, url);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("Public IP lookup via {} failed: {}", url, e);
                    failures.push(format!("{}: {}", url, e));
                }
            }
        }

        Err(Error::public_ip(failures.join("; ")))
    }
}
