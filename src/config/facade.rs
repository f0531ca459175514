//! The configuration facade
//!
//! [`Config`] combines the source registry, the converter registry and the
//! filter chain behind a single lookup surface.

use super::context::ScopeGuard;
use super::secret::{secret_string, SecretString};
use crate::converter::{Converter, ConverterRegistration, ConverterRegistry};
use crate::core::accessor::ValueAccessor;
use crate::domain::{Result, ScopeId};
use crate::filter::{FilterChain, SharedFilter};
use crate::source::{SharedSource, SourceRegistry};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Prioritized property lookup over a set of sources
///
/// Sources are consulted in descending ordinal order and the first one
/// defining a key wins. Every value passes through the filter chain before
/// it is returned.
///
/// # Example
///
/// ```rust
/// use strata::config::ConfigBuilder;
/// use strata::source::MapSource;
///
/// # fn example() -> strata::domain::Result<()> {
/// let config = ConfigBuilder::new()
///     .ignore_default_sources()
///     .with_source(MapSource::new("defaults").with_ordinal(10).with_property("port", "80"))
///     .with_source(MapSource::new("site").with_ordinal(200).with_property("port", "8080"))
///     .build()?;
///
/// assert_eq!(config.get_value("port"), Some("8080".to_string()));
/// assert_eq!(config.get_value_as::<i32>("port")?, Some(8080));
/// # Ok(())
/// # }
/// ```
pub struct Config {
    scope: ScopeId,
    sources: SourceRegistry,
    converters: ConverterRegistry,
    filters: FilterChain,
    closed: AtomicBool,
}

impl Config {
    /// Creates a configuration without sources or filters, holding only the
    /// built-in converters
    pub fn new(scope: ScopeId) -> Self {
        Self {
            scope,
            sources: SourceRegistry::new(),
            converters: ConverterRegistry::new(),
            filters: FilterChain::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Scope owning this configuration
    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    /// Returns the filtered value of `key` from the highest-ordinal source
    /// defining it, or `None` if no source does
    pub fn get_value(&self, key: &str) -> Option<String> {
        let _scope = ScopeGuard::enter(&self.scope);

        for source in self.sources.sources().iter() {
            if let Some(raw) = source.get_value(key) {
                tracing::debug!(
                    key = %key,
                    source = %source.name(),
                    ordinal = source.ordinal(),
                    "Found value for key"
                );
                return Some(self.filters.filter_value(key, &raw));
            }
        }

        tracing::trace!(key = %key, "No source defines key");
        None
    }

    /// Returns the value of `key` converted to `T`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingConverter`](crate::domain::StrataError::MissingConverter)
    /// on every call if no converter handles `T`, whether or not the key is
    /// defined, and [`StrataError::Conversion`](crate::domain::StrataError::Conversion)
    /// if the value cannot be converted.
    pub fn get_value_as<T: 'static>(&self, key: &str) -> Result<Option<T>> {
        let value = self.get_value(key);
        self.convert(key, value.as_deref())
    }

    /// Converts a raw value with the converter registered for `T`
    pub fn convert<T: 'static>(&self, key: &str, value: Option<&str>) -> Result<Option<T>> {
        self.converters.convert(key, value)
    }

    /// Returns the filtered value of `key` wrapped as a secret
    ///
    /// The returned value is zeroized on drop and redacted from `Debug`.
    pub fn get_secret(&self, key: &str) -> Option<SecretString> {
        self.get_value(key).map(secret_string)
    }

    /// Merges the properties of every scannable source
    ///
    /// Sources are merged in ascending ordinal order, so a key defined by
    /// several sources maps to the value of the highest-ordinal one.
    /// Unscannable sources never contribute, even though they answer
    /// [`get_value`](Self::get_value).
    pub fn get_all_properties(&self) -> BTreeMap<String, String> {
        let _scope = ScopeGuard::enter(&self.scope);

        let mut merged = BTreeMap::new();
        for source in self.sources.sources().iter().rev() {
            if !source.is_scannable() {
                tracing::trace!(source = %source.name(), "Skipping unscannable source");
                continue;
            }
            merged.extend(source.get_properties());
        }

        merged
            .into_iter()
            .map(|(key, raw)| {
                let value = self.filters.filter_value(&key, &raw);
                (key, value)
            })
            .collect()
    }

    /// Sources in lookup order
    pub fn get_sources(&self) -> Arc<Vec<SharedSource>> {
        self.sources.sources()
    }

    /// Adds sources and re-sorts the lookup order
    pub fn add_sources<I>(&self, sources: I)
    where
        I: IntoIterator<Item = SharedSource>,
    {
        self.sources.add_sources(sources);
    }

    /// Adds a typed converter, see [`ConverterRegistry::add_converter`]
    pub fn add_converter<T, C>(&self, converter: C) -> bool
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        self.converters.add_converter::<T, C>(converter)
    }

    /// Adds a converter registration, see [`ConverterRegistry::add_registration`]
    pub fn add_converter_registration(&self, registration: ConverterRegistration) -> Result<bool> {
        self.converters.add_registration(registration)
    }

    /// Appends filters to the filter chain
    pub fn add_filters<I>(&self, filters: I)
    where
        I: IntoIterator<Item = SharedFilter>,
    {
        self.filters.add_filters(filters);
    }

    /// Converter registry of this configuration
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Filter chain of this configuration
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Runs `value` through the log transform of every filter
    pub fn filter_value_for_log(&self, key: &str, value: &str) -> String {
        self.filters.filter_value_for_log(key, value)
    }

    /// Starts a fluent, cacheable lookup of `key`
    pub fn access(&self, key: impl Into<String>) -> ValueAccessor<'_, String> {
        ValueAccessor::new(self, key)
    }

    /// Releases every source and filter
    ///
    /// Failures are logged and skipped so every resource gets a release
    /// attempt. Calling `close` again does nothing.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let _scope = ScopeGuard::enter(&self.scope);
        self.sources.close_all();
        self.filters.close_all();
        tracing::debug!(scope = %self.scope, "Configuration closed");
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("scope", &self.scope)
            .field("sources", &self.sources.len())
            .field("converters", &self.converters.len())
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::context::current_scope;
    use crate::domain::StrataError;
    use crate::filter::ConfigFilter;
    use crate::source::{MapSource, PropertySource};
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    fn config_with(sources: Vec<MapSource>) -> Config {
        let config = Config::new(ScopeId::new("test").unwrap());
        config.add_sources(sources.into_iter().map(|s| Arc::new(s) as SharedSource));
        config
    }

    struct Suffix(&'static str);

    impl ConfigFilter for Suffix {
        fn filter_value(&self, _key: &str, value: &str) -> String {
            format!("{value}{}", self.0)
        }
    }

    #[test]
    fn test_highest_ordinal_wins() {
        let config = config_with(vec![
            MapSource::new("low").with_ordinal(10).with_property("k", "low"),
            MapSource::new("high").with_ordinal(500).with_property("k", "high"),
            MapSource::new("mid").with_ordinal(100).with_property("k", "mid"),
        ]);
        assert_eq!(config.get_value("k"), Some("high".to_string()));
    }

    #[test]
    fn test_falls_through_to_lower_sources() {
        let config = config_with(vec![
            MapSource::new("low").with_ordinal(10).with_property("only.low", "x"),
            MapSource::new("high").with_ordinal(500),
        ]);
        assert_eq!(config.get_value("only.low"), Some("x".to_string()));
        assert_eq!(config.get_value("nowhere"), None);
    }

    #[test]
    fn test_filters_apply_to_point_lookups() {
        let config = config_with(vec![MapSource::new("s").with_property("k", "v")]);
        config.add_filters(vec![Arc::new(Suffix("!")) as SharedFilter]);
        assert_eq!(config.get_value("k"), Some("v!".to_string()));
    }

    #[test]
    fn test_typed_lookup() {
        let config = config_with(vec![MapSource::new("s")
            .with_property("port", "8080")
            .with_property("debug", "on")]);
        assert_eq!(config.get_value_as::<i32>("port").unwrap(), Some(8080));
        assert_eq!(config.get_value_as::<bool>("debug").unwrap(), Some(true));
        assert_eq!(config.get_value_as::<i64>("missing").unwrap(), None);
    }

    #[test]
    fn test_missing_converter_every_call() {
        #[derive(Debug)]
        struct Unregistered;

        let config = config_with(vec![MapSource::new("s").with_property("k", "v")]);
        for key in ["k", "k", "missing"] {
            let result = config.get_value_as::<Unregistered>(key);
            assert!(matches!(result, Err(StrataError::MissingConverter { .. })));
        }
    }

    #[test]
    fn test_all_properties_merge_and_scannable() {
        let config = config_with(vec![
            MapSource::new("low")
                .with_ordinal(10)
                .with_property("shared", "low")
                .with_property("low.only", "1"),
            MapSource::new("high")
                .with_ordinal(200)
                .with_property("shared", "high"),
            MapSource::new("hidden")
                .with_ordinal(900)
                .with_scannable(false)
                .with_property("shared", "hidden")
                .with_property("hidden.only", "2"),
        ]);
        config.add_filters(vec![Arc::new(Suffix("*")) as SharedFilter]);

        let all = config.get_all_properties();
        assert_eq!(all.get("shared"), Some(&"high*".to_string()));
        assert_eq!(all.get("low.only"), Some(&"1*".to_string()));
        assert!(!all.contains_key("hidden.only"));

        // point lookups still see the unscannable source
        assert_eq!(config.get_value("hidden.only"), Some("2*".to_string()));
        assert_eq!(config.get_value("shared"), Some("hidden*".to_string()));
    }

    #[test]
    fn test_get_secret() {
        let config = config_with(vec![MapSource::new("s").with_property("db.password", "pw")]);
        let secret = config.get_secret("db.password").unwrap();
        assert_eq!(secret.expose_secret().as_ref(), "pw");
        assert!(!format!("{secret:?}").contains("pw"));
        assert!(config.get_secret("missing").is_none());
    }

    struct ScopeReporter;

    impl PropertySource for ScopeReporter {
        fn name(&self) -> &str {
            "scope-reporter"
        }

        fn get_value(&self, key: &str) -> Option<String> {
            (key == "scope").then(|| current_scope().map(|s| s.into_inner()).unwrap_or_default())
        }

        fn get_properties(&self) -> HashMap<String, String> {
            HashMap::new()
        }
    }

    #[test]
    fn test_scope_installed_during_lookup() {
        let config = Config::new(ScopeId::new("tenant-a").unwrap());
        config.add_sources(vec![Arc::new(ScopeReporter) as SharedSource]);

        assert_eq!(config.get_value("scope"), Some("tenant-a".to_string()));
        assert_eq!(current_scope(), None);
    }

    struct CountingClose {
        closes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PropertySource for CountingClose {
        fn name(&self) -> &str {
            "closing"
        }

        fn get_value(&self, _key: &str) -> Option<String> {
            None
        }

        fn get_properties(&self) -> HashMap<String, String> {
            HashMap::new()
        }

        fn close(&self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StrataError::Source("connection already gone".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_close_continues_past_failures_and_is_idempotent() {
        let closes = Arc::new(AtomicUsize::new(0));
        let config = Config::new(ScopeId::default());
        config.add_sources(vec![
            Arc::new(CountingClose {
                closes: closes.clone(),
                fail: true,
            }) as SharedSource,
            Arc::new(CountingClose {
                closes: closes.clone(),
                fail: false,
            }) as SharedSource,
        ]);

        config.close();
        config.close();

        assert_eq!(closes.load(Ordering::SeqCst), 2);
        assert!(config.is_closed());
        assert_eq!(current_scope(), None);
    }
}
