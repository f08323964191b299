// # IP Source Trait
//
// Resolves the machine's current public IP address once per pass.
//
// ## Implementations
//
// - HTTP: `homeddns-ip-http` crate

use crate::error::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public IP address lookups
///
/// A failure must be reported as [`crate::Error::PublicIp`]; the driver
/// treats it as fatal for the pass.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    async fn current(&self) -> Result<IpAddr>;
}
