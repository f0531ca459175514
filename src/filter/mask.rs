//! Masking of secret values in logs

use super::ConfigFilter;
use crate::domain::errors::StrataError;
use crate::domain::result::Result;
use regex::Regex;

/// Key pattern masked by [`SecretMaskFilter::new`]
pub const DEFAULT_SECRET_PATTERN: &str = r"(?i)password|passwd|pwd|secret|token|credential";

/// Replacement shown in logs for masked values
pub const MASK: &str = "*****";

/// Masks values of secret-looking keys in the log path
///
/// The value returned to callers is never changed.
pub struct SecretMaskFilter {
    key_pattern: Regex,
}

impl SecretMaskFilter {
    /// Masks keys matching [`DEFAULT_SECRET_PATTERN`]
    pub fn new() -> Self {
        Self {
            key_pattern: Regex::new(DEFAULT_SECRET_PATTERN).expect("default pattern is valid"),
        }
    }

    /// Masks keys matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Configuration`] if `pattern` is not a valid regex.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let key_pattern = Regex::new(pattern).map_err(|e| {
            StrataError::Configuration(format!("Invalid secret key pattern '{pattern}': {e}"))
        })?;
        Ok(Self { key_pattern })
    }

    /// Whether values of `key` are masked
    pub fn is_secret(&self, key: &str) -> bool {
        self.key_pattern.is_match(key)
    }
}

impl Default for SecretMaskFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFilter for SecretMaskFilter {
    fn name(&self) -> &str {
        "secret-mask"
    }

    fn filter_value(&self, _key: &str, value: &str) -> String {
        value.to_string()
    }

    fn filter_value_for_log(&self, key: &str, value: &str) -> String {
        if self.is_secret(key) {
            MASK.to_string()
        } else {
            value.to_string()
        }
    }
}
