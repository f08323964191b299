//! Plugin-based provider registry
//!
//! The registry maps the provider names used in the configuration file to
//! factories, so the reconciler never hard-codes a list of backends.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use homeddns_core::{Credentials, ProviderRegistry};
//!
//! let mut registry = ProviderRegistry::new();
//! homeddns_provider_godaddy::register(&mut registry);
//!
//! let provider = registry.create_provider("godaddy", &Credentials::new("id", "key"))?;
//! ```
//!
//! ## Registration
//!
//! Adapter crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &mut ProviderRegistry) {
//!     registry.register_provider("godaddy", Box::new(GodaddyFactory));
//! }
//! ```

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;

/// Provider registry for plugin-based DNS provider creation
///
/// Built once at startup and then only read. Names are matched
/// case-insensitively.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn DnsProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under `name`
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_provider(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn DnsProviderFactory>,
    ) {
        let name = name.into().to_ascii_lowercase();
        tracing::debug!(provider = %name, "Registered DNS provider");
        self.providers.insert(name, factory);
    }

    /// Create a provider instance bound to `credentials`
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error::UnknownProvider)`: If no factory is registered under `name`
    /// - `Err(Error)`: Whatever the factory reports
    pub fn create_provider(
        &self,
        name: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn DnsProvider>> {
        let factory = self
            .providers
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::unknown_provider(name))?;

        factory.create(credentials)
    }

    /// Check if a provider is registered
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(&name.to_ascii_lowercase())
    }

    /// List all registered provider names, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}
