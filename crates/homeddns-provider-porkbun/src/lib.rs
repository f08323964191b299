// # Porkbun DNS Provider
//
// This crate provides the Porkbun implementation of `homeddns_core::DnsProvider`.
//
// ## Behavior
//
// - One HTTP request per trait call, no retries, no caching
// - HTTP timeout of 30 seconds on every request
// - Credentials travel in the JSON body (`apikey` / `secretapikey`)
// - TTL below 3600 seconds (or unset) is raised to 3600 and sent as a string
// - Priority is sent as `prio` only when set; port, weight, service and
//   protocol are not part of the Porkbun API and are never sent
// - The apex name `@` is addressed as an empty subdomain
//
// ## API Reference
//
// - JSON API v3: https://porkbun.com/api/json/v3/documentation
// - Retrieve: POST `/api/json/v3/dns/retrieveByNameType/:domain/:type[/:subdomain]`
// - Create: POST `/api/json/v3/dns/create/:domain`
// - Edit: POST `/api/json/v3/dns/editByNameType/:domain/:type[/:subdomain]`

use async_trait::async_trait;
use homeddns_core::defaults::{clamp_ttl, non_zero};
use homeddns_core::{
    Credentials, DnsProvider, DnsProviderFactory, DnsRecord, Error, ProviderRegistry, Result,
};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Porkbun API base URL
const PORKBUN_API_BASE: &str = "https://api.porkbun.com";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Smallest TTL sent to Porkbun
pub const MIN_TTL: u32 = 3600;

const PROVIDER_NAME: &str = "porkbun";

/// Status value of a successful Porkbun response
const STATUS_SUCCESS: &str = "SUCCESS";

/// Porkbun DNS provider
pub struct PorkbunProvider {
    credentials: Credentials,

    /// Base URL without trailing slash, overridable for tests
    base_url: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the API keys
impl std::fmt::Debug for PorkbunProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorkbunProvider")
            .field("credentials", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PorkbunProvider {
    /// Create a provider talking to the production API
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, PORKBUN_API_BASE)
    }

    /// Create a provider talking to `base_url` instead of the production API
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        if credentials.is_empty() {
            return Err(Error::config(
                "Porkbun apikey and secretapikey cannot be empty",
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

    fn auth(&self) -> Auth<'_> {
        Auth {
            apikey: &self.credentials.client_id,
            secretapikey: &self.credentials.client_key,
        }
    }

    /// `/api/json/v3/dns/:action/:domain`
    fn dns_url(&self, action: &str, domain: &str) -> String {
        format!("{}/api/json/v3/dns/{}/{}", self.base_url, action, domain)
    }

    /// `/api/json/v3/dns/:action/:domain/:type[/:subdomain]`
    fn by_name_type_url(&self, action: &str, domain: &str, record: &DnsRecord) -> String {
        let mut url = format!("{}/{}", self.dns_url(action, domain), record.record_type);
        let subdomain = subdomain(&record.name);
        if !subdomain.is_empty() {
            url.push('/');
            url.push_str(subdomain);
        }
        url
    }

    /// POST `body` to `url` and return the response body of a successful call
    ///
    /// Both a non-success HTTP status and a 200 answer whose `status` is not
    /// `SUCCESS` become `Error::Api`.
    async fn post<T: Serialize + ?Sized>(&self, url: String, body: &T) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("Porkbun request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read Porkbun response: {}", e)))?;

        if !status.is_success() {
            tracing::debug!("Porkbun answered {}: {}", status, text);
            return Err(api_error(status, &text));
        }

        let envelope: StatusEnvelope = serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Porkbun response: {}", e)))?;
        if envelope.status != STATUS_SUCCESS {
            return Err(Error::api(PROVIDER_NAME, envelope.status, envelope.message));
        }

        Ok(text)
    }
}

#[async_trait]
impl DnsProvider for PorkbunProvider {
    async fn get_record(&self, domain: &str, record: &DnsRecord) -> Result<Option<DnsRecord>> {
        tracing::debug!("Fetching Porkbun record {} in {}", record, domain);

        let url = self.by_name_type_url("retrieveByNameType", domain, record);
        let body = self.post(url, &self.auth()).await?;

        let response: RetrieveResponse = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Porkbun record list: {}", e)))?;

        Ok(response
            .records
            .into_iter()
            .next()
            .map(|found| found.into_record(domain, record)))
    }

    async fn set_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        tracing::debug!("Creating Porkbun record {} in {}", record, domain);

        let payload = CreateRequest {
            auth: self.auth(),
            name: subdomain(&record.name),
            record_type: record.record_type.as_str(),
            content: &record.value,
            ttl: clamp_ttl(record.ttl, MIN_TTL).to_string(),
            prio: non_zero(record.priority),
        };
        self.post(self.dns_url("create", domain), &payload).await?;
        Ok(())
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        tracing::debug!("Editing Porkbun record {} in {}", record, domain);

        let payload = EditRequest {
            auth: self.auth(),
            content: &record.value,
            ttl: clamp_ttl(record.ttl, MIN_TTL).to_string(),
            prio: non_zero(record.priority),
        };
        let url = self.by_name_type_url("editByNameType", domain, record);
        self.post(url, &payload).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Porkbun addresses the apex as an empty subdomain
fn subdomain(name: &str) -> &str {
    if name == "@" { "" } else { name }
}

/// Map an FQDN from a Porkbun response back to a host label
fn host_label(fqdn: &str, domain: &str) -> String {
    let fqdn = fqdn.trim_end_matches('.');
    if fqdn.eq_ignore_ascii_case(domain) {
        return "@".to_string();
    }
    let lowered = fqdn.to_ascii_lowercase();
    match lowered
        .strip_suffix(&domain.to_ascii_lowercase())
        .and_then(|label| label.strip_suffix('.'))
    {
        // ASCII lowercasing keeps byte offsets, so the label can be cut from the original
        Some(label) => fqdn[..label.len()].to_string(),
        None => fqdn.to_string(),
    }
}

#[derive(Serialize)]
struct Auth<'a> {
    apikey: &'a str,
    secretapikey: &'a str,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    #[serde(flatten)]
    auth: Auth<'a>,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'static str,
    content: &'a str,
    ttl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prio: Option<u32>,
}

#[derive(Serialize)]
struct EditRequest<'a> {
    #[serde(flatten)]
    auth: Auth<'a>,
    content: &'a str,
    ttl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prio: Option<u32>,
}

/// `{status, message}`, present on every Porkbun response
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    records: Vec<PorkbunRecord>,
}

#[derive(Debug, Deserialize)]
struct PorkbunRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    ttl: u32,
    #[serde(default, alias = "priority", deserialize_with = "lenient_u32")]
    prio: u32,
}

impl PorkbunRecord {
    fn into_record(self, domain: &str, requested: &DnsRecord) -> DnsRecord {
        let name = if self.name.is_empty() {
            requested.name.clone()
        } else {
            host_label(&self.name, domain)
        };

        DnsRecord::new(name, requested.record_type)
            .with_value(self.content)
            .with_ttl(self.ttl)
            .with_priority(self.prio)
    }
}

/// Porkbun sends numbers as strings, numbers, or null
fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Normalize an error response into `Error::Api`
fn api_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<StatusEnvelope>(body) {
        Ok(envelope) if !envelope.status.is_empty() => {
            Error::api(PROVIDER_NAME, envelope.status, envelope.message)
        }
        _ => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                body.trim().to_string()
            };
            Error::api(PROVIDER_NAME, status.as_u16().to_string(), message)
        }
    }
}

/// Factory for creating Porkbun providers
pub struct PorkbunFactory;

impl DnsProviderFactory for PorkbunFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(PorkbunProvider::new(credentials.clone())?))
    }
}

/// Register the Porkbun provider with a registry
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(PorkbunFactory));
}
