//! Command-line arguments
//!
//! Every flag can also be set through a `HOMEDDNS_*` environment variable.

use clap::Parser;
use homeddns_ip_http::DEFAULT_IP_URL;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Keep DNS records at GoDaddy and Porkbun in sync with this machine's public IP
#[derive(Debug, Parser)]
#[command(name = "homeddns", version, about)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "HOMEDDNS_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Public IP lookup URL; repeat or comma-separate to add fallbacks
    #[arg(
        long = "ip-url",
        env = "HOMEDDNS_IP_URL",
        value_delimiter = ',',
        default_value = DEFAULT_IP_URL
    )]
    pub ip_urls: Vec<String>,

    /// Seconds between passes; without it a single pass runs and the process exits
    #[arg(
        long,
        env = "HOMEDDNS_INTERVAL",
        value_parser = clap::value_parser!(u64).range(10..=86_400)
    )]
    pub interval: Option<u64>,

    /// Fetch and compare records but send no writes
    #[arg(long, env = "HOMEDDNS_DRY_RUN")]
    pub dry_run: bool,

    /// trace, debug, info, warn or error
    #[arg(long, env = "HOMEDDNS_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
}

impl Args {
    pub fn interval(&self) -> Option<Duration> {
        self.interval.map(Duration::from_secs)
    }
}
