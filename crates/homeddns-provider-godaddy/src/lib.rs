// # GoDaddy DNS Provider
//
// This crate provides the GoDaddy implementation of `homeddns_core::DnsProvider`.
//
// ## Behavior
//
// - One HTTP request per trait call, no retries, no caching
// - HTTP timeout of 30 seconds on every request
// - TTL below 600 seconds (or unset) is raised to 600
// - Port outside [1, 65535] is sent as 1
// - Priority, weight, service and protocol are only sent when set
// - Every non-success status becomes `Error::Api { code, message }`
//
// ## Security
//
// - The client key NEVER appears in logs or `Debug` output
// - The provider refuses to build with empty credentials
//
// ## API Reference
//
// - Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - Get records: GET `/v1/domains/:domain/records/:type/:name`
// - Add records: PATCH `/v1/domains/:domain/records`
// - Replace records: PUT `/v1/domains/:domain/records/:type/:name`

use async_trait::async_trait;
use homeddns_core::defaults::{clamp_ttl, non_empty, non_zero, normalize_port};
use homeddns_core::{
    Credentials, DnsProvider, DnsProviderFactory, DnsRecord, Error, ProviderRegistry, Result,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// GoDaddy API base URL
const GODADDY_API_BASE: &str = "https://api.godaddy.com";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Smallest TTL GoDaddy accepts
pub const MIN_TTL: u32 = 600;

const PROVIDER_NAME: &str = "godaddy";

/// GoDaddy DNS provider
///
/// Authenticates every request with an `sso-key {id}:{key}` header.
pub struct GodaddyProvider {
    credentials: Credentials,

    /// Base URL without trailing slash, overridable for tests
    base_url: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GodaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GodaddyProvider")
            .field("credentials", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GodaddyProvider {
    /// Create a provider talking to the production API
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, GODADDY_API_BASE)
    }

    /// Create a provider talking to `base_url` instead of the production API
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        if credentials.is_empty() {
            return Err(Error::config(
                "GoDaddy client_id and client_key cannot be empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn auth_header(&self) -> String {
        format!(
            "sso-key {}:{}",
            self.credentials.client_id, self.credentials.client_key
        )
    }

    /// `/v1/domains/:domain/records`
    fn records_url(&self, domain: &str) -> String {
        format!("{}/v1/domains/{}/records", self.base_url, domain)
    }

    /// `/v1/domains/:domain/records/:type/:name`
    fn record_url(&self, domain: &str, record: &DnsRecord) -> String {
        format!(
            "{}/{}/{}",
            self.records_url(domain),
            record.record_type,
            record.name
        )
    }

    /// Send a request and turn any non-success status into `Error::Api`
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("GoDaddy request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        tracing::debug!("GoDaddy answered {}: {}", status, body);

        Err(api_error(status, &body))
    }
}

#[async_trait]
impl DnsProvider for GodaddyProvider {
    async fn get_record(&self, domain: &str, record: &DnsRecord) -> Result<Option<DnsRecord>> {
        tracing::debug!("Fetching GoDaddy record {} in {}", record, domain);

        let response = self
            .send(self.client.get(self.record_url(domain, record)))
            .await?;

        let records: Vec<GodaddyRecord> = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("GoDaddy record list: {}", e)))?;

        Ok(records
            .into_iter()
            .next()
            .map(|found| found.into_record(record)))
    }

    async fn set_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let payload = [GodaddyRecord::from_desired(record)];
        tracing::debug!("Creating GoDaddy record {} in {}", record, domain);

        self.send(self.client.patch(self.records_url(domain)).json(&payload))
            .await?;
        Ok(())
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let payload = [GodaddyRecord::from_desired(record)];
        tracing::debug!("Replacing GoDaddy record {} in {}", record, domain);

        self.send(
            self.client
                .put(self.record_url(domain, record))
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// A record as the Domains API reads and writes it
///
/// `name` and `type` are repeated in PUT bodies even though they are part of
/// the URL; the API rejects the call without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GodaddyRecord {
    data: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    record_type: String,
    #[serde(default)]
    ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
}

impl GodaddyRecord {
    /// Build the write payload, applying GoDaddy's defaulting policy
    fn from_desired(record: &DnsRecord) -> Self {
        Self {
            data: record.value.clone(),
            name: record.name.clone(),
            record_type: record.record_type.to_string(),
            ttl: clamp_ttl(record.ttl, MIN_TTL),
            port: Some(normalize_port(record.port)),
            priority: non_zero(record.priority),
            weight: non_zero(record.weight),
            service: non_empty(&record.service),
            protocol: non_empty(&record.protocol),
        }
    }

    /// Convert a fetched record; the type is the one that was queried
    fn into_record(self, requested: &DnsRecord) -> DnsRecord {
        let name = if self.name.is_empty() {
            requested.name.clone()
        } else {
            self.name
        };

        DnsRecord {
            name,
            value: self.data,
            record_type: requested.record_type,
            ttl: self.ttl,
            priority: self.priority.unwrap_or_default(),
            weight: self.weight.unwrap_or_default(),
            port: self.port.unwrap_or_default(),
            service: self.service.unwrap_or_default(),
            protocol: self.protocol.unwrap_or_default(),
        }
    }
}

/// GoDaddy reports `code` sometimes as a string and sometimes as an integer
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorCode {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Text(code) => f.write_str(code),
            ErrorCode::Number(code) => write!(f, "{}", code),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GodaddyError {
    #[serde(default)]
    code: Option<ErrorCode>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    fields: Vec<GodaddyErrorField>,
}

#[derive(Debug, Deserialize)]
struct GodaddyErrorField {
    #[serde(default)]
    message: String,
    #[serde(default)]
    path: String,
}

/// Normalize an error response into `Error::Api`
///
/// Falls back to the HTTP status as code and the raw body as message when
/// the body is not a GoDaddy error envelope.
fn api_error(status: StatusCode, body: &str) -> Error {
    let fallback_code = status.as_u16().to_string();
    let fallback_message = || {
        if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("no response body").to_string()
        } else {
            body.trim().to_string()
        }
    };

    let envelope = match serde_json::from_str::<GodaddyError>(body) {
        Ok(envelope) => envelope,
        Err(_) => return Error::api(PROVIDER_NAME, fallback_code, fallback_message()),
    };

    let code = envelope
        .code
        .map(|c| c.to_string())
        .unwrap_or(fallback_code);

    // Every envelope field is optional, so `{}` parses too
    let mut message = if envelope.message.is_empty() {
        status.canonical_reason().unwrap_or("no message").to_string()
    } else {
        envelope.message
    };
    let details: Vec<String> = envelope
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.path, f.message))
        .collect();
    if !details.is_empty() {
        message = format!("{} ({})", message, details.join("; "));
    }

    Error::api(PROVIDER_NAME, code, message)
}

/// Factory for creating GoDaddy providers
pub struct GodaddyFactory;

impl DnsProviderFactory for GodaddyFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(GodaddyProvider::new(credentials.clone())?))
    }
}

/// Register the GoDaddy provider with a registry
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(GodaddyFactory));
}
