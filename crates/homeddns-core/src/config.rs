//! Configuration types for homeddns
//!
//! The configuration is a YAML document listing providers, their credentials,
//! and the domains and records each provider manages:
//!
//! ```yaml
//! providers:
//!   - name: godaddy
//!     client_id: "id"
//!     client_key: "key"
//!     domains:
//!       - domain: example.com
//!         records:
//!           - name: test
//!             type: A
//!             ttl: 700
//! ```

use crate::error::{Error, Result};
use crate::record::DnsRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&input)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), strip_prefix(e))))
    }

    /// Validate the configuration
    ///
    /// Rejects an empty provider list, providers without name, credentials
    /// or domains, unnamed domains and records, duplicate `(name, type)`
    /// pairs inside a domain, and a file that declares no record at all.
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(Error::config("No providers configured"));
        }

        for provider in &self.providers {
            provider.validate()?;
        }

        if self.record_count() == 0 {
            return Err(Error::config("No records configured"));
        }

        Ok(())
    }

    /// Total number of records across every provider and domain
    pub fn record_count(&self) -> usize {
        self.providers
            .iter()
            .flat_map(|p| &p.domains)
            .map(|d| d.records.len())
            .sum()
    }
}

/// One provider block: which backend, which account, which domains
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name, resolved through the registry
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub client_id: String,

    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub client_key: String,

    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

impl ProviderConfig {
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client_id: client_id.into(),
            client_key: client_key.into(),
            domains: Vec::new(),
        }
    }

    pub fn with_domain(mut self, domain: DomainConfig) -> Self {
        self.domains.push(domain);
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.client_key)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("Provider name is required"));
        }
        if self.client_id.is_empty() {
            return Err(Error::config(format!(
                "Provider '{}': client_id is required",
                self.name
            )));
        }
        if self.client_key.is_empty() {
            return Err(Error::config(format!(
                "Provider '{}': client_key is required",
                self.name
            )));
        }
        if self.domains.is_empty() {
            return Err(Error::config(format!(
                "Provider '{}': at least one domain is required",
                self.name
            )));
        }

        for domain in &self.domains {
            domain.validate(&self.name)?;
        }

        Ok(())
    }
}

// Custom Debug implementation that hides the client key
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("client_id", &self.client_id)
            .field("client_key", &"<REDACTED>")
            .field("domains", &self.domains)
            .finish()
    }
}

/// A domain and the ordered list of records to keep in sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub records: Vec<DnsRecord>,
}

impl DomainConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: DnsRecord) -> Self {
        self.records.push(record);
        self
    }

    fn validate(&self, provider: &str) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::config(format!(
                "Provider '{}': domain name is required",
                provider
            )));
        }

        let mut seen = HashSet::new();
        for record in &self.records {
            if record.name.trim().is_empty() {
                return Err(Error::config(format!(
                    "Domain '{}': record name is required",
                    self.domain
                )));
            }
            if !seen.insert(record.key()) {
                return Err(Error::config(format!(
                    "Domain '{}': duplicate record {} {}",
                    self.domain, record.record_type, record.name
                )));
            }
        }

        Ok(())
    }
}

/// Account credentials handed to a provider factory
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    /// ⚠️ NEVER log this value
    pub client_key: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_key: client_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_empty() || self.client_key.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &"<REDACTED>")
            .field("client_key", &"<REDACTED>")
            .finish()
    }
}

fn strip_prefix(err: Error) -> String {
    match err {
        Error::Config(msg) => msg,
        other => other.to_string(),
    }
}
