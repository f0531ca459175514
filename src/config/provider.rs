//! Per-scope registry of configurations

use super::builder::{ConfigBuilder, ConfigRegistrar};
use super::context::current_scope;
use super::facade::Config;
use crate::domain::{Result, ScopeId, StrataError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out one configuration per scope
///
/// The first request for a scope builds its configuration with the default
/// sources and every registrar, later requests return the same instance.
/// A scope going away must call [`release_config`](Self::release_config) so
/// its sources and filters are closed.
///
/// # Example
///
/// ```rust
/// use strata::config::ConfigProvider;
/// use strata::domain::ScopeId;
/// use std::sync::Arc;
///
/// # fn example() -> strata::domain::Result<()> {
/// let provider = ConfigProvider::new();
/// let scope = ScopeId::new("plugin-a").unwrap();
///
/// let first = provider.get_config(&scope)?;
/// let second = provider.get_config(&scope)?;
/// assert!(Arc::ptr_eq(&first, &second));
///
/// assert!(provider.release_config(&scope));
/// assert!(first.is_closed());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigProvider {
    configs: Mutex<HashMap<ScopeId, Arc<Config>>>,
    registrars: Vec<Arc<dyn ConfigRegistrar>>,
}

impl ConfigProvider {
    /// Creates a provider without registrars
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registrar consulted for every configuration built from now on
    pub fn with_registrar(mut self, registrar: Arc<dyn ConfigRegistrar>) -> Self {
        self.registrars.push(registrar);
        self
    }

    /// Returns the configuration of `scope`, building it on first use
    ///
    /// # Errors
    ///
    /// Propagates build failures, e.g. an invalid converter registration
    /// from a registrar. Nothing is registered in that case.
    pub fn get_config(&self, scope: &ScopeId) -> Result<Arc<Config>> {
        let mut configs = self.configs.lock();
        if let Some(config) = configs.get(scope) {
            return Ok(config.clone());
        }

        let config = Arc::new(self.builder().for_scope(scope.clone()).build()?);
        configs.insert(scope.clone(), config.clone());
        tracing::debug!(scope = %scope, "Registered configuration on first use");
        Ok(config)
    }

    /// Returns the configuration of the scope entered on this thread, or of
    /// the default scope outside any scope
    pub fn get_current_config(&self) -> Result<Arc<Config>> {
        let scope = current_scope().unwrap_or_default();
        self.get_config(&scope)
    }

    /// Starts a builder preloaded with this provider's registrars
    ///
    /// The result is not registered; pass it to
    /// [`register_config`](Self::register_config) for that.
    pub fn builder(&self) -> ConfigBuilder {
        self.registrars
            .iter()
            .cloned()
            .fold(ConfigBuilder::new(), ConfigBuilder::with_registrar)
    }

    /// Registers a configuration built elsewhere under its own scope
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Configuration`] if the scope already has a
    /// configuration. The existing one stays registered.
    pub fn register_config(&self, config: Arc<Config>) -> Result<()> {
        let mut configs = self.configs.lock();
        let scope = config.scope().clone();
        if configs.contains_key(&scope) {
            return Err(StrataError::Configuration(format!(
                "A configuration is already registered for scope '{scope}'"
            )));
        }

        configs.insert(scope.clone(), config);
        tracing::debug!(scope = %scope, "Registered configuration");
        Ok(())
    }

    /// Removes the configuration of `scope` and closes it
    ///
    /// Returns whether a configuration was registered.
    pub fn release_config(&self, scope: &ScopeId) -> bool {
        // closed after the lock is released
        let removed = self.configs.lock().remove(scope);
        match removed {
            Some(config) => {
                config.close();
                tracing::debug!(scope = %scope, "Released configuration");
                true
            }
            None => false,
        }
    }

    /// Creates an empty configuration for the current scope without
    /// registering it
    pub fn new_config(&self) -> Config {
        Config::new(current_scope().unwrap_or_default())
    }

    /// Scopes that currently have a configuration, sorted
    pub fn scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self.configs.lock().keys().cloned().collect();
        scopes.sort();
        scopes
    }

    /// Releases every registered configuration
    pub fn release_all(&self) {
        let drained: Vec<(ScopeId, Arc<Config>)> = self.configs.lock().drain().collect();
        for (scope, config) in drained {
            config.close();
            tracing::debug!(scope = %scope, "Released configuration");
        }
    }
}
