//! Environment variable property source

use super::PropertySource;
use std::collections::HashMap;

/// Ordinal of the environment source
pub const ENV_ORDINAL: i32 = 300;

/// Property source reading the process environment
///
/// Lookups are live, so variables set after the source was created are seen.
/// A key is tried as-is, then with every character that is not ASCII
/// alphanumeric replaced by `_`, then upper-cased: `db.pool-size` matches
/// `db.pool-size`, `db_pool_size` or `DB_POOL_SIZE`.
pub struct EnvSource {
    ordinal: i32,
}

impl EnvSource {
    /// Creates the environment source with its default ordinal
    pub fn new() -> Self {
        Self {
            ordinal: ENV_ORDINAL,
        }
    }

    /// Overrides the ordinal
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    fn sanitize(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &str) -> Option<String> {
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }

        let sanitized = Self::sanitize(key);
        if sanitized != key {
            if let Ok(value) = std::env::var(&sanitized) {
                return Some(value);
            }
        }

        let upper = sanitized.to_ascii_uppercase();
        if upper != sanitized {
            if let Ok(value) = std::env::var(&upper) {
                return Some(value);
            }
        }

        None
    }

    fn get_properties(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}
