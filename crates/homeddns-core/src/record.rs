//! DNS record model
//!
//! A [`DnsRecord`] is identified by `(name, type)` inside a domain. Zero and
//! empty attributes mean "not applicable"; an empty `value` means the value is
//! derived at reconcile time (see [`DnsRecord::resolve`]).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource record types accepted by at least one provider
///
/// Whether a given provider accepts a type is left to its API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Ns,
    Caa,
    Soa,
    Alias,
    Tlsa,
    Https,
    Svcb,
}

impl RecordType {
    /// Wire name of the type, as used in provider URLs and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Ns => "NS",
            RecordType::Caa => "CAA",
            RecordType::Soa => "SOA",
            RecordType::Alias => "ALIAS",
            RecordType::Tlsa => "TLSA",
            RecordType::Https => "HTTPS",
            RecordType::Svcb => "SVCB",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            "SRV" => Ok(RecordType::Srv),
            "NS" => Ok(RecordType::Ns),
            "CAA" => Ok(RecordType::Caa),
            "SOA" => Ok(RecordType::Soa),
            "ALIAS" => Ok(RecordType::Alias),
            "TLSA" => Ok(RecordType::Tlsa),
            "HTTPS" => Ok(RecordType::Https),
            "SVCB" => Ok(RecordType::Svcb),
            other => Err(format!("unsupported record type: {}", other)),
        }
    }
}

impl TryFrom<String> for RecordType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

/// A single DNS resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Host label, `@` for the zone apex
    pub name: String,

    /// Record data; empty means "derive from context"
    #[serde(default)]
    pub value: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Seconds, 0 = unset
    #[serde(default, deserialize_with = "saturating_u32")]
    pub ttl: u32,

    #[serde(default, deserialize_with = "saturating_u32")]
    pub priority: u32,

    #[serde(default, deserialize_with = "saturating_u32")]
    pub weight: u32,

    /// Adapters send ports outside `[1, 65535]` as 1
    #[serde(default, deserialize_with = "saturating_u32")]
    pub port: u32,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub protocol: String,
}

/// Accept any integer (or null) and saturate it into `u32`
///
/// Negative values become 0 ("unset"), which the adapters then default like
/// any other unset field: the TTL is raised to the minimum and the port to 1.
fn saturating_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

impl DnsRecord {
    /// Create a record with only a name and a type
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            record_type,
            ttl: 0,
            priority: 0,
            weight: 0,
            port: 0,
            service: String::new(),
            protocol: String::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_port(mut self, port: u32) -> Self {
        self.port = port;
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Identity of the record within its domain
    pub fn key(&self) -> (&str, RecordType) {
        (self.name.as_str(), self.record_type)
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Return the desired form of this record for the given public IP.
    ///
    /// An explicit value is kept as is. Otherwise CNAME records point at the
    /// apex (`@`) and every other type takes the public IP.
    pub fn resolve(&self, public_ip: &str) -> DnsRecord {
        let mut desired = self.clone();
        if !desired.has_value() {
            desired.value = match self.record_type {
                RecordType::Cname => "@".to_string(),
                _ => public_ip.to_string(),
            };
        }
        desired
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.record_type, self.name)
    }
}
