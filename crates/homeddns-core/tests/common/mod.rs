//! Test doubles and common utilities for reconciliation tests
//!
//! `MockDnsProvider` keeps an in-memory zone so writes are visible to later
//! fetches, counts every call, and can be told to fail specific calls.

#![allow(dead_code)]

use homeddns_core::error::{Error, Result};
use homeddns_core::{
    Config, Credentials, DnsProvider, DnsProviderFactory, DnsRecord, DomainConfig,
    ProviderConfig, RecordType,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PUBLIC_IP: &str = "1.2.3.4";

/// Provider call kinds, used for failure injection and the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Set,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub domain: String,
    pub record: DnsRecord,
}

type ZoneKey = (String, String, RecordType);

/// A mock DnsProvider that tracks calls
pub struct MockDnsProvider {
    pub name: &'static str,
    zone: Arc<Mutex<HashMap<ZoneKey, DnsRecord>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<HashSet<(Op, String)>>>,
    get_call_count: Arc<AtomicUsize>,
    set_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            zone: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
            get_call_count: Arc::new(AtomicUsize::new(0)),
            set_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a new MockDnsProvider that shares state and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name,
            zone: Arc::clone(&other.zone),
            calls: Arc::clone(&other.calls),
            failures: Arc::clone(&other.failures),
            get_call_count: Arc::clone(&other.get_call_count),
            set_call_count: Arc::clone(&other.set_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
        }
    }

    /// Seed the zone with an existing record
    pub fn with_existing(self, domain: &str, record: DnsRecord) -> Self {
        self.zone.lock().unwrap().insert(
            (domain.to_string(), record.name.clone(), record.record_type),
            record,
        );
        self
    }

    /// Make every `op` call for the record named `name` fail with an API error
    pub fn failing_on(self, op: Op, name: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((op, name.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.set_call_count() + self.update_call_count()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Writes only, in order
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.op != Op::Get)
            .collect()
    }

    /// Current value held by the fake zone
    pub fn value_of(&self, domain: &str, name: &str, record_type: RecordType) -> Option<String> {
        self.zone
            .lock()
            .unwrap()
            .get(&(domain.to_string(), name.to_string(), record_type))
            .map(|r| r.value.clone())
    }

    fn record_call(&self, op: Op, domain: &str, record: &DnsRecord) -> Result<()> {
        self.calls.lock().unwrap().push(Call {
            op,
            domain: domain.to_string(),
            record: record.clone(),
        });

        if self
            .failures
            .lock()
            .unwrap()
            .contains(&(op, record.name.clone()))
        {
            return Err(Error::api(self.name, "500", format!("{:?} rejected", op)));
        }
        Ok(())
    }

    fn store(&self, domain: &str, record: &DnsRecord) {
        self.zone.lock().unwrap().insert(
            (domain.to_string(), record.name.clone(), record.record_type),
            record.clone(),
        );
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_record(&self, domain: &str, record: &DnsRecord) -> Result<Option<DnsRecord>> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        self.record_call(Op::Get, domain, record)?;

        Ok(self
            .zone
            .lock()
            .unwrap()
            .get(&(domain.to_string(), record.name.clone(), record.record_type))
            .cloned())
    }

    async fn set_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);
        self.record_call(Op::Set, domain, record)?;
        self.store(domain, record);
        Ok(())
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.record_call(Op::Update, domain, record)?;
        self.store(domain, record);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Factory handing out providers that share state with `provider`
pub struct MockFactory {
    provider: Arc<MockDnsProvider>,
    seen_credentials: Arc<Mutex<Vec<Credentials>>>,
}

impl MockFactory {
    pub fn new(provider: &Arc<MockDnsProvider>) -> Self {
        Self {
            provider: Arc::clone(provider),
            seen_credentials: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen_credentials(&self) -> Arc<Mutex<Vec<Credentials>>> {
        Arc::clone(&self.seen_credentials)
    }
}

impl DnsProviderFactory for MockFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsProvider>> {
        self.seen_credentials
            .lock()
            .unwrap()
            .push(credentials.clone());
        Ok(Box::new(MockDnsProvider::sharing_counters_with(
            &self.provider,
        )))
    }
}

/// A factory that refuses every set of credentials
pub struct FailingFactory;

impl DnsProviderFactory for FailingFactory {
    fn create(&self, _credentials: &Credentials) -> Result<Box<dyn DnsProvider>> {
        Err(Error::config("credentials rejected"))
    }
}

/// One provider, one domain, the given records
pub fn single_domain_config(provider: &str, domain: &str, records: Vec<DnsRecord>) -> Config {
    let mut domain = DomainConfig::new(domain);
    domain.records = records;

    Config {
        providers: vec![ProviderConfig::new(provider, "test-id", "test-key").with_domain(domain)],
    }
}
