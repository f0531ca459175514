//! Assembly of configurations

use super::facade::Config;
use crate::converter::{Converter, ConverterRegistration};
use crate::domain::{Result, ScopeId};
use crate::filter::{ConfigFilter, SharedFilter};
use crate::source::{ConfigSourceProvider, EnvSource, PropertySource, SharedSource};
use std::sync::Arc;

/// Contributes sources, converters and filters to every configuration a
/// provider builds
///
/// Registrars replace runtime discovery: an application lists them once and
/// the [`ConfigProvider`](super::ConfigProvider) consults them for each
/// scope. Every method defaults to contributing nothing.
pub trait ConfigRegistrar: Send + Sync {
    /// Sources for `scope`
    fn sources(&self, _scope: &ScopeId) -> Vec<SharedSource> {
        Vec::new()
    }

    /// Source providers consulted for every scope
    fn source_providers(&self) -> Vec<Arc<dyn ConfigSourceProvider>> {
        Vec::new()
    }

    /// Converter registrations
    fn converters(&self) -> Vec<ConverterRegistration> {
        Vec::new()
    }

    /// Filters, appended in the returned order
    fn filters(&self) -> Vec<SharedFilter> {
        Vec::new()
    }
}

/// Builder for [`Config`]
///
/// Unless [`ignore_default_sources`](Self::ignore_default_sources) is
/// called, the process environment is added as a source with ordinal
/// [`ENV_ORDINAL`](crate::source::env::ENV_ORDINAL).
///
/// # Example
///
/// ```rust
/// use strata::config::ConfigBuilder;
/// use strata::filter::SecretMaskFilter;
/// use strata::source::MapSource;
///
/// # fn example() -> strata::domain::Result<()> {
/// let config = ConfigBuilder::new()
///     .for_scope("billing".parse().unwrap())
///     .ignore_default_sources()
///     .with_source(MapSource::new("inline").with_property("db.password", "hunter2"))
///     .with_filter(SecretMaskFilter::new())
///     .build()?;
///
/// assert_eq!(config.scope().as_str(), "billing");
/// assert_eq!(config.filter_value_for_log("db.password", "hunter2"), "*****");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    scope: ScopeId,
    sources: Vec<SharedSource>,
    providers: Vec<Arc<dyn ConfigSourceProvider>>,
    converters: Vec<ConverterRegistration>,
    filters: Vec<SharedFilter>,
    registrars: Vec<Arc<dyn ConfigRegistrar>>,
    ignore_default_sources: bool,
}

impl ConfigBuilder {
    /// Creates a builder for the default scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scope owning the configuration
    pub fn for_scope(mut self, scope: ScopeId) -> Self {
        self.scope = scope;
        self
    }

    /// Adds a source
    pub fn with_source(mut self, source: impl PropertySource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Adds shared sources
    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = SharedSource>,
    {
        self.sources.extend(sources);
        self
    }

    /// Adds a source provider
    pub fn with_source_provider(mut self, provider: Arc<dyn ConfigSourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Adds source providers
    pub fn with_source_providers<I>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ConfigSourceProvider>>,
    {
        self.providers.extend(providers);
        self
    }

    /// Adds a typed converter
    pub fn with_converter<T, C>(mut self, converter: C) -> Self
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        self.converters
            .push(ConverterRegistration::of::<T, C>(converter));
        self
    }

    /// Adds converter registrations, validated when the configuration is built
    pub fn with_converters<I>(mut self, registrations: I) -> Self
    where
        I: IntoIterator<Item = ConverterRegistration>,
    {
        self.converters.extend(registrations);
        self
    }

    /// Appends a filter to the chain
    pub fn with_filter(mut self, filter: impl ConfigFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Appends shared filters to the chain
    pub fn with_filters<I>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = SharedFilter>,
    {
        self.filters.extend(filters);
        self
    }

    /// Adds a registrar
    pub fn with_registrar(mut self, registrar: Arc<dyn ConfigRegistrar>) -> Self {
        self.registrars.push(registrar);
        self
    }

    /// Skips the environment source
    pub fn ignore_default_sources(mut self) -> Self {
        self.ignore_default_sources = true;
        self
    }

    /// Builds the configuration
    ///
    /// Explicit additions come first, then each registrar's contributions in
    /// registration order. Filters keep that order in the chain.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidConverterDeclaration`](crate::domain::StrataError::InvalidConverterDeclaration)
    /// if a converter registration does not declare a usable target type.
    /// The sources and filters collected so far are closed before the error is
    /// returned.
    pub fn build(self) -> Result<Config> {
        let config = Config::new(self.scope);
        let scope = config.scope().clone();

        let mut sources: Vec<SharedSource> = Vec::new();
        if !self.ignore_default_sources {
            sources.push(Arc::new(EnvSource::new()));
        }
        sources.extend(self.sources);

        let mut providers = self.providers;
        let mut converters = self.converters;
        let mut filters = self.filters;
        for registrar in &self.registrars {
            sources.extend(registrar.sources(&scope));
            providers.extend(registrar.source_providers());
            converters.extend(registrar.converters());
            filters.extend(registrar.filters());
        }

        for provider in &providers {
            sources.extend(
                provider
                    .config_sources(&scope)
                    .into_iter()
                    .map(|provided| provided.into_source()),
            );
        }

        config.add_sources(sources);
        config.add_filters(filters);
        for registration in converters {
            if let Err(e) = config.add_converter_registration(registration) {
                // nothing else holds the half-built config
                config.close();
                return Err(e);
            }
        }

        tracing::info!(
            scope = %scope,
            sources = config.get_sources().len(),
            converters = config.converters().len(),
            filters = config.filters().len(),
            "Configuration built"
        );

        Ok(config)
    }
}
