// # homeddns-core
//
// Core library for homeddns: keeps DNS records at one or more providers in
// sync with the machine's public IP address.
//
// ## Architecture Overview
//
// - **DnsRecord**: the record model shared by configuration and adapters
// - **DnsProvider**: trait for reading and writing records through a provider API
// - **IpSource**: trait for resolving the current public IP
// - **ProviderRegistry**: maps provider names from the configuration to factories
// - **Reconciler**: compares desired and observed records and issues the minimal write
//
// ## Design Principles
//
// 1. **Stateless passes**: every pass starts from live provider state, nothing is cached
// 2. **Plugin-Based**: adapters live in their own crates and register a factory
// 3. **Contained failures**: one record or provider failing never stops the others
// 4. **Library-First**: the daemon is a thin driver around this crate

pub mod config;
pub mod defaults;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{Config, Credentials, DomainConfig, ProviderConfig};
pub use error::{Error, Result};
pub use reconciler::{
    DomainReport, ProviderReport, ProviderStatus, ReconcileReport, Reconciler, RecordAction,
    RecordOutcome, Stage,
};
pub use record::{DnsRecord, RecordType};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory, IpSource};
