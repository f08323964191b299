// # DNS Provider Trait
//
// Defines the capability every provider adapter offers the reconciler.
//
// ## Implementations
//
// - GoDaddy: `homeddns-provider-godaddy` crate
// - Porkbun: `homeddns-provider-porkbun` crate
//
// ## Usage
//
// ```rust,ignore
// use homeddns_core::{DnsProvider, DnsRecord, RecordType};
//
// let record = DnsRecord::new("test", RecordType::A).with_value("1.2.3.4");
// match provider.get_record("example.com", &record).await? {
//     Some(observed) if observed.value == record.value => {}
//     Some(_) => provider.update_record("example.com", &record).await?,
//     None => provider.set_record("example.com", &record).await?,
// }
// ```

use crate::config::Credentials;
use crate::error::Result;
use crate::record::DnsRecord;
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// An adapter translates these three calls into its backend's HTTP API and
/// normalizes every backend rejection into [`crate::Error::Api`].
///
/// Adapters make exactly one request per call. They never retry, never
/// cache between calls, and never decide whether a write is needed; that
/// decision belongs to the [`crate::Reconciler`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the record matching `(record.name, record.record_type)` in `domain`.
    ///
    /// Returns `Ok(None)` when the provider has no such record. When several
    /// records match, only the first one is returned.
    async fn get_record(&self, domain: &str, record: &DnsRecord) -> Result<Option<DnsRecord>>;

    /// Create `record` in `domain`.
    async fn set_record(&self, domain: &str, record: &DnsRecord) -> Result<()>;

    /// Overwrite the record matching `(record.name, record.record_type)` in `domain`.
    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from credentials
///
/// Credentials are bound at construction time, so a provider instance is
/// ready to use as soon as it exists.
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance for one account
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsProvider>>;
}
