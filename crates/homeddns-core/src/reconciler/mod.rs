//! Record reconciler
//!
//! The Reconciler walks the configuration in order and, for each record,
//! issues the minimal write that makes the provider match the desired value.
//!
//! ## Flow per record
//!
//! ```text
//! get_record ──► observed absent or empty ──► set_record     (Created)
//!            ├─► observed != desired      ──► update_record  (Updated)
//!            └─► observed == desired      ──► no call        (Unchanged)
//! ```
//!
//! The desired value is the configured one, or when empty `@` for CNAME
//! records and the public IP for every other type.
//!
//! ## Failure containment
//!
//! An error on any call marks that record `Failed` and the pass moves on. An
//! unknown provider name or a factory error skips that provider block. Nothing
//! is retried within a pass; the next pass starts again from live state.

mod report;

pub use report::{
    DomainReport, ProviderReport, ProviderStatus, ReconcileReport, RecordAction, RecordOutcome,
    Stage,
};

use crate::config::{Config, DomainConfig, ProviderConfig};
use crate::error::Error;
use crate::record::DnsRecord;
use crate::registry::ProviderRegistry;
use crate::traits::DnsProvider;
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Drives one reconciliation pass over a configuration
pub struct Reconciler<'a> {
    registry: &'a ProviderRegistry,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self {
            registry,
            dry_run: false,
        }
    }

    /// In dry-run mode records are still fetched and compared, but no write
    /// is sent. Outcomes report what would have been written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile every provider, domain and record of `config` against
    /// `public_ip`, sequentially and in configuration order.
    pub async fn reconcile(&self, config: &Config, public_ip: &str) -> ReconcileReport {
        let started_at = Utc::now();
        info!(
            "Starting reconciliation: {} provider(s), {} record(s), public IP {}",
            config.providers.len(),
            config.record_count(),
            public_ip
        );

        let mut providers = Vec::with_capacity(config.providers.len());
        for provider_config in &config.providers {
            providers.push(self.reconcile_provider(provider_config, public_ip).await);
        }

        let report = ReconcileReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: self.dry_run,
            providers,
        };
        info!("Reconciliation finished: {}", report);
        report
    }

    async fn reconcile_provider(
        &self,
        provider_config: &ProviderConfig,
        public_ip: &str,
    ) -> ProviderReport {
        let name = provider_config.name.as_str();

        let provider = match self
            .registry
            .create_provider(name, &provider_config.credentials())
        {
            Ok(provider) => provider,
            Err(e @ Error::UnknownProvider(_)) => {
                warn!(provider = %name, "Skipping provider: {}", e);
                return ProviderReport::skipped(name, e.to_string());
            }
            Err(e) => {
                error!(provider = %name, "Skipping provider, could not create it: {}", e);
                return ProviderReport::skipped(name, e.to_string());
            }
        };

        let mut domains = Vec::with_capacity(provider_config.domains.len());
        for domain in &provider_config.domains {
            domains.push(
                self.reconcile_domain(provider.as_ref(), domain, public_ip)
                    .await,
            );
        }

        ProviderReport {
            provider: name.to_string(),
            status: ProviderStatus::Processed,
            domains,
        }
    }

    /// Reconcile the records of one domain against an already built provider
    pub async fn reconcile_domain(
        &self,
        provider: &dyn DnsProvider,
        domain: &DomainConfig,
        public_ip: &str,
    ) -> DomainReport {
        let mut records = Vec::with_capacity(domain.records.len());
        for record in &domain.records {
            records.push(
                self.reconcile_record(provider, &domain.domain, record, public_ip)
                    .await,
            );
        }

        DomainReport {
            domain: domain.domain.clone(),
            records,
        }
    }

    /// Reconcile a single record
    pub async fn reconcile_record(
        &self,
        provider: &dyn DnsProvider,
        domain: &str,
        record: &DnsRecord,
        public_ip: &str,
    ) -> RecordOutcome {
        let provider_name = provider.provider_name();
        let action = match provider.get_record(domain, record).await {
            Err(e) => self.failed(provider_name, domain, record, Stage::Fetch, e),
            Ok(observed) => {
                let desired = record.resolve(public_ip);
                match observed.filter(DnsRecord::has_value) {
                    None => self.create(provider, domain, desired).await,
                    Some(observed) if observed.value != desired.value => {
                        self.update(provider, domain, desired, observed.value).await
                    }
                    Some(_) => {
                        debug!(
                            provider = provider_name,
                            domain,
                            "Record {} already has value {}, skipping",
                            desired,
                            desired.value
                        );
                        RecordAction::Unchanged {
                            value: desired.value,
                        }
                    }
                }
            }
        };

        RecordOutcome {
            name: record.name.clone(),
            record_type: record.record_type,
            action,
        }
    }

    async fn create(
        &self,
        provider: &dyn DnsProvider,
        domain: &str,
        desired: DnsRecord,
    ) -> RecordAction {
        let provider_name = provider.provider_name();
        if self.dry_run {
            info!(
                provider = provider_name,
                domain,
                "[DRY-RUN] Would create record {} -> {}",
                desired,
                desired.value
            );
            return RecordAction::Created {
                value: desired.value,
            };
        }

        match provider.set_record(domain, &desired).await {
            Ok(()) => {
                info!(
                    provider = provider_name,
                    domain,
                    "Created record {} -> {}",
                    desired,
                    desired.value
                );
                RecordAction::Created {
                    value: desired.value,
                }
            }
            Err(e) => self.failed(provider_name, domain, &desired, Stage::Create, e),
        }
    }

    async fn update(
        &self,
        provider: &dyn DnsProvider,
        domain: &str,
        desired: DnsRecord,
        previous: String,
    ) -> RecordAction {
        let provider_name = provider.provider_name();
        if self.dry_run {
            info!(
                provider = provider_name,
                domain,
                "[DRY-RUN] Would update record {}: {} -> {}",
                desired,
                previous,
                desired.value
            );
            return RecordAction::Updated {
                previous,
                value: desired.value,
            };
        }

        match provider.update_record(domain, &desired).await {
            Ok(()) => {
                info!(
                    provider = provider_name,
                    domain,
                    "Updated record {}: {} -> {}",
                    desired,
                    previous,
                    desired.value
                );
                RecordAction::Updated {
                    previous,
                    value: desired.value,
                }
            }
            Err(e) => self.failed(provider_name, domain, &desired, Stage::Update, e),
        }
    }

    fn failed(
        &self,
        provider_name: &str,
        domain: &str,
        record: &DnsRecord,
        stage: Stage,
        err: Error,
    ) -> RecordAction {
        match &err {
            Error::Api { code, message, .. } => error!(
                provider = provider_name,
                domain,
                code = %code,
                "Failed to {} record {}: {}",
                stage,
                record,
                message
            ),
            _ => error!(
                provider = provider_name,
                domain,
                "Failed to {} record {}: {}",
                stage,
                record,
                err
            ),
        }

        RecordAction::Failed {
            stage,
            error: err.to_string(),
        }
    }
}
