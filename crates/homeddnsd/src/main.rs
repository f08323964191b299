// # homeddns - DNS record reconciler daemon
//
// The daemon is a thin driver around `homeddns-core`. It is responsible for:
// 1. Parsing flags and environment variables
// 2. Initializing logging and the runtime
// 3. Registering the provider adapters
// 4. Running one reconciliation pass, or one pass per interval tick
//
// Each pass reloads the configuration file, resolves the public IP, and hands
// both to the reconciler. Nothing is kept between passes.
//
// ## Example
//
// ```bash
// # single pass, e.g. from cron
// homeddns --config /etc/homeddns/config.yaml
//
// # every five minutes until SIGTERM
// HOMEDDNS_INTERVAL=300 homeddns --config /etc/homeddns/config.yaml
// ```

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use homeddns_core::{Config, IpSource, ProviderRegistry, ReconcileReport, Reconciler};
use homeddns_ip_http::HttpIpSource;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown, or a single pass with no failures
/// - 1: Configuration or startup error
/// - 2: Runtime error (public IP lookup, runtime setup)
/// - 3: Single pass finished but some records failed or providers were skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
    PartialFailure = 3,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting homeddns");

    // Fail fast on a broken configuration, before any network call
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };
    info!(
        "Configuration loaded from {}: {} provider(s), {} record(s)",
        args.config.display(),
        config.providers.len(),
        config.record_count()
    );

    let ip_source = match HttpIpSource::from_urls(args.ip_urls.clone()) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let registry = build_registry();
    for name in config.providers.iter().map(|p| &p.name) {
        if !registry.has_provider(name) {
            warn!(
                "Provider '{}' is not available (known: {}); its records will be skipped",
                name,
                registry.list_providers().join(", ")
            );
        }
    }

    // Sequential work only, one thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let daemon = Daemon {
        args: &args,
        registry: &registry,
        ip_source: &ip_source,
    };

    let code = rt.block_on(async {
        match args.interval() {
            None => daemon.run_once(config).await,
            Some(interval) => match daemon.run_periodic(interval).await {
                Ok(()) => DdnsExitCode::CleanShutdown,
                Err(e) => {
                    error!("Daemon error: {}", e);
                    DdnsExitCode::RuntimeError
                }
            },
        }
    });

    code.into()
}

/// Register every adapter compiled into this binary
fn build_registry() -> ProviderRegistry {
    #[allow(unused_mut)]
    let mut registry = ProviderRegistry::new();

    #[cfg(feature = "godaddy")]
    homeddns_provider_godaddy::register(&mut registry);

    #[cfg(feature = "porkbun")]
    homeddns_provider_porkbun::register(&mut registry);

    registry
}

struct Daemon<'a> {
    args: &'a Args,
    registry: &'a ProviderRegistry,
    ip_source: &'a dyn IpSource,
}

impl Daemon<'_> {
    /// Run a single pass with an already loaded configuration
    ///
    /// Configuration errors were already reported at load time, so an aborted
    /// pass here is always a public IP failure.
    async fn run_once(&self, config: Config) -> DdnsExitCode {
        match self.pass(&config).await {
            Ok(report) if report.has_failures() => DdnsExitCode::PartialFailure,
            Ok(_) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Pass aborted: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    }

    /// Run one pass per tick until a shutdown signal arrives
    ///
    /// The configuration is reloaded every tick. A fatal error aborts only the
    /// current pass; the next tick tries again.
    async fn run_periodic(&self, interval: Duration) -> Result<()> {
        info!("Running a pass every {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let shutdown = wait_for_shutdown();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    info!("Received shutdown signal: {}", signal?);
                    info!("Shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let outcome = match Config::load(&self.args.config) {
                        Ok(config) => self.pass(&config).await,
                        Err(e) => Err(e),
                    };
                    if let Err(e) = outcome {
                        error!("Pass aborted: {}", e);
                    }
                }
            }
        }
    }

    /// Resolve the public IP and reconcile every configured record
    async fn pass(&self, config: &Config) -> homeddns_core::Result<ReconcileReport> {
        let public_ip = self.ip_source.current().await?.to_string();

        let report = Reconciler::new(self.registry)
            .with_dry_run(self.args.dry_run)
            .reconcile(config, &public_ip)
            .await;

        if report.has_failures() {
            warn!("Pass finished with failures: {}", report);
        }
        Ok(report)
    }
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
