//! Property sources
//!
//! A property source is a named provider of string-valued properties with an
//! ordinal. Sources with a higher ordinal are consulted first, so they
//! override whatever lower sources define for the same key.
//!
//! # Built-in sources
//!
//! - [`EnvSource`] - process environment, ordinal 300
//! - [`MapSource`] - in-memory map, mutable at runtime
//! - [`TomlSource`] - a TOML document flattened into dotted keys
//!
//! # Example
//!
//! ```rust
//! use strata::source::{MapSource, PropertySource};
//!
//! let source = MapSource::new("defaults")
//!     .with_ordinal(50)
//!     .with_property("server.port", "8080");
//!
//! assert_eq!(source.get_value("server.port"), Some("8080".to_string()));
//! assert_eq!(source.ordinal(), 50);
//! ```

pub mod env;
pub mod file;
pub mod map;
pub mod registry;

pub use env::EnvSource;
pub use file::TomlSource;
pub use map::MapSource;
pub use registry::SourceRegistry;

use crate::domain::{Result, ScopeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Ordinal used by sources that do not declare one
pub const DEFAULT_ORDINAL: i32 = 100;

/// Shared handle to a property source
pub type SharedSource = Arc<dyn PropertySource>;

/// A named provider of string-valued properties
///
/// Implementations must be cheap to query: every lookup through a
/// configuration walks the sources in ordinal order until one answers.
/// The engine never mutates a source.
pub trait PropertySource: Send + Sync {
    /// Human-readable name, used in logs and diagnostics
    fn name(&self) -> &str;

    /// Priority of this source. Higher wins.
    fn ordinal(&self) -> i32 {
        DEFAULT_ORDINAL
    }

    /// Returns the raw value for `key`, or `None` if this source does not
    /// define it
    fn get_value(&self, key: &str) -> Option<String>;

    /// Returns every property this source can enumerate
    fn get_properties(&self) -> HashMap<String, String>;

    /// Whether [`get_properties`](Self::get_properties) takes part in bulk
    /// enumeration. Unscannable sources still answer point lookups.
    fn is_scannable(&self) -> bool {
        true
    }

    /// Releases resources held by this source
    ///
    /// # Errors
    ///
    /// Errors are logged by the owning configuration and otherwise ignored.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl fmt::Debug for dyn PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySource")
            .field("name", &self.name())
            .field("ordinal", &self.ordinal())
            .field("scannable", &self.is_scannable())
            .finish()
    }
}

/// A source together with the ordinal a provider assigned to it
#[derive(Clone)]
pub struct ProvidedSource {
    /// The provided source
    pub source: SharedSource,

    /// Ordinal to use instead of the source's own
    pub ordinal: i32,
}

impl ProvidedSource {
    /// Creates a new provided source
    pub fn new(source: SharedSource, ordinal: i32) -> Self {
        Self { source, ordinal }
    }

    /// Wraps the source so it reports the provided ordinal
    pub fn into_source(self) -> SharedSource {
        Arc::new(WithOrdinal::new(self.source, self.ordinal))
    }
}

/// Supplies sources discovered at startup, e.g. one per database table
///
/// How providers themselves are found is up to the caller; the
/// configuration builder only consumes what they return.
pub trait ConfigSourceProvider: Send + Sync {
    /// Returns the sources this provider contributes to `scope`
    fn config_sources(&self, scope: &ScopeId) -> Vec<ProvidedSource>;
}

/// Adapter that overrides the ordinal of another source
pub struct WithOrdinal {
    inner: SharedSource,
    ordinal: i32,
}

impl WithOrdinal {
    /// Wraps `inner` with a fixed ordinal
    pub fn new(inner: SharedSource, ordinal: i32) -> Self {
        Self { inner, ordinal }
    }
}

impl PropertySource for WithOrdinal {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.inner.get_value(key)
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.inner.get_properties()
    }

    fn is_scannable(&self) -> bool {
        self.inner.is_scannable()
    }

    fn close(&self) -> Result<()> {
        self.inner.close()
    }
}
