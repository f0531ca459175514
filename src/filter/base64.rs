//! Decoding of base64-encoded values

use super::ConfigFilter;
use ::base64::engine::general_purpose::STANDARD;
use ::base64::Engine;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Marker prefix of encoded values
pub const BASE64_PREFIX: &str = "base64:";

/// Decodes values written as `base64:<payload>`
///
/// Values without the prefix pass through. A payload that is not valid
/// base64 or not UTF-8 is passed through unchanged and logged.
///
/// The log path never shows a decoded value: values of keys this filter has
/// decoded are encoded again, prefix included.
#[derive(Debug, Default)]
pub struct Base64Filter {
    decoded_keys: RwLock<HashSet<String>>,
}

impl Base64Filter {
    /// Creates the filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value of `key` has been decoded
    pub fn has_decoded(&self, key: &str) -> bool {
        self.decoded_keys.read().contains(key)
    }
}

impl ConfigFilter for Base64Filter {
    fn name(&self) -> &str {
        "base64"
    }

    fn filter_value(&self, key: &str, value: &str) -> String {
        let Some(payload) = value.strip_prefix(BASE64_PREFIX) else {
            return value.to_string();
        };

        match STANDARD
            .decode(payload.trim())
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()))
        {
            Ok(decoded) => {
                if !self.has_decoded(key) {
                    self.decoded_keys.write().insert(key.to_string());
                }
                decoded
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not decode base64 value");
                value.to_string()
            }
        }
    }

    fn filter_value_for_log(&self, key: &str, value: &str) -> String {
        if value.starts_with(BASE64_PREFIX) || !self.has_decoded(key) {
            return value.to_string();
        }
        format!("{BASE64_PREFIX}{}", STANDARD.encode(value))
    }
}
