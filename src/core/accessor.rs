//! Fluent, cacheable lookup of a single key

use super::interpolation;
use crate::config::Config;
use crate::domain::{Result, StrataError};
use std::any::Any;
use std::fmt;
use std::time::{Duration, Instant};

/// Resolves one key with an optional type, default, cache and variable
/// substitution
///
/// An accessor is meant to be kept at the place a value is read and called
/// repeatedly. It is not meant to be shared between threads: concurrent
/// callers around a cache expiry would each resolve the value again.
///
/// # Example
///
/// ```rust
/// use strata::config::ConfigBuilder;
/// use strata::source::MapSource;
/// use std::time::Duration;
///
/// # fn example() -> strata::domain::Result<()> {
/// let config = ConfigBuilder::new()
///     .ignore_default_sources()
///     .with_source(
///         MapSource::new("app")
///             .with_property("greeting", "Hello, ${name}!")
///             .with_property("name", "World"),
///     )
///     .build()?;
///
/// let mut greeting = config.access("greeting").evaluate_variables(true);
/// assert_eq!(greeting.get_value()?.as_deref(), Some("Hello, World!"));
///
/// let mut retries = config
///     .access("http.retries")
///     .as_type::<i32>()
///     .with_string_default("3")?
///     .cache_for(Duration::from_secs(60));
/// assert_eq!(retries.get_value()?, Some(3));
/// # Ok(())
/// # }
/// ```
pub struct ValueAccessor<'a, T> {
    config: &'a Config,
    key: String,
    resolved_key: Option<String>,
    default_value: Option<T>,
    cache_for: Option<Duration>,
    evaluate_variables: bool,
    log_changes: bool,
    last_value: Option<T>,
    reload_after: Option<Instant>,
}

impl<'a> ValueAccessor<'a, String> {
    pub(crate) fn new(config: &'a Config, key: impl Into<String>) -> Self {
        Self {
            config,
            key: key.into(),
            resolved_key: None,
            default_value: None,
            cache_for: None,
            evaluate_variables: false,
            log_changes: false,
            last_value: None,
            reload_after: None,
        }
    }
}

impl<'a, T> ValueAccessor<'a, T>
where
    T: Clone + PartialEq + 'static,
{
    /// Switches the target type
    ///
    /// The default and any cached value belong to the old type and are
    /// dropped; the other settings are kept.
    pub fn as_type<N>(self) -> ValueAccessor<'a, N>
    where
        N: Clone + PartialEq + 'static,
    {
        ValueAccessor {
            config: self.config,
            key: self.key,
            resolved_key: self.resolved_key,
            default_value: None,
            cache_for: self.cache_for,
            evaluate_variables: self.evaluate_variables,
            log_changes: self.log_changes,
            last_value: None,
            reload_after: None,
        }
    }

    /// Value returned when the key is absent or maps to an empty string
    pub fn with_default(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the default from its string form, converted like any other value
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidDefault`] if `value` is empty, and
    /// propagates missing-converter and conversion errors.
    pub fn with_string_default(mut self, value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(StrataError::InvalidDefault {
                key: self.key.clone(),
            });
        }

        self.default_value = self.config.convert::<T>(&self.key, Some(value))?;
        Ok(self)
    }

    /// Caches the resolved value for `duration`
    ///
    /// A zero duration disables caching.
    pub fn cache_for(mut self, duration: Duration) -> Self {
        self.cache_for = (!duration.is_zero()).then_some(duration);
        self.reload_after = None;
        self
    }

    /// Whether `${name}` references are substituted
    pub fn evaluate_variables(mut self, evaluate: bool) -> Self {
        self.evaluate_variables = evaluate;
        self
    }

    /// Whether a changed value is logged
    pub fn log_changes(mut self, log: bool) -> Self {
        self.log_changes = log;
        self
    }

    /// Resolves the value
    ///
    /// While a cached value is fresh it is returned without consulting any
    /// source. Otherwise the raw value is looked up, variables are
    /// substituted if enabled, the result is converted and the default
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingConverter`] on every call if no
    /// converter handles `T`, and [`StrataError::Conversion`] if the value
    /// cannot be converted. Failed resolutions are not cached.
    pub fn get_value(&mut self) -> Result<Option<T>> {
        let now = Instant::now();
        if self.cache_for.is_some() {
            if let Some(reload_after) = self.reload_after {
                if now <= reload_after {
                    return Ok(self.last_value.clone());
                }
            }
        }

        let raw = self.resolve_raw();
        let mut value = self.config.convert::<T>(&self.key, raw.as_deref())?;

        if self.default_value.is_some() && is_empty(&value) {
            tracing::trace!(key = %self.key, "Using default value");
            value = self.default_value.clone();
        }

        if self.log_changes && value != self.last_value {
            let shown = raw
                .as_deref()
                .map(|r| self.config.filter_value_for_log(&self.key, r));
            crate::log_value_change!(self.key, shown.as_deref());
        }

        self.last_value = value.clone();
        if let Some(ttl) = self.cache_for {
            self.reload_after = Some(now + ttl);
        }

        Ok(value)
    }

    /// Key as requested
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key the last resolution looked up, `None` before the first one
    pub fn resolved_key(&self) -> Option<&str> {
        self.resolved_key.as_deref()
    }

    /// Configured default
    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    fn resolve_raw(&mut self) -> Option<String> {
        self.resolved_key = Some(self.key.clone());
        let mut chain = vec![self.key.clone()];
        interpolation::resolve(self.config, &self.key, self.evaluate_variables, &mut chain)
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueAccessor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueAccessor")
            .field("key", &self.key)
            .field("default_value", &self.default_value)
            .field("cache_for", &self.cache_for)
            .field("evaluate_variables", &self.evaluate_variables)
            .field("log_changes", &self.log_changes)
            .finish_non_exhaustive()
    }
}

/// Absent values and empty strings both count as empty
fn is_empty<T: 'static>(value: &Option<T>) -> bool {
    match value {
        None => true,
        Some(v) => (v as &dyn Any)
            .downcast_ref::<String>()
            .is_some_and(String::is_empty),
    }
}
