//! Core traits for homeddns
//!
//! - [`DnsProvider`]: read and write records through a provider API
//! - [`IpSource`]: resolve the current public IP

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use ip_source::IpSource;
