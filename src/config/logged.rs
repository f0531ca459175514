//! Lookup logging wrapper

use super::facade::Config;
use crate::source::SharedSource;
use std::sync::Arc;
use tracing::Level;

/// Key fragments whose values are never logged
const SENSITIVE_FRAGMENTS: [&str; 3] = ["password", "pwd", "secret"];

/// Wraps a [`Config`] and logs every value it hands out
///
/// Values of keys containing `password`, `pwd` or `secret` are never
/// logged; everything else goes through the configuration's log filters
/// first.
#[derive(Debug, Clone)]
pub struct LoggedConfig {
    inner: Arc<Config>,
    level: Level,
}

impl LoggedConfig {
    /// Logs lookups at `INFO`
    pub fn new(inner: Arc<Config>) -> Self {
        Self {
            inner,
            level: Level::INFO,
        }
    }

    /// Sets the level lookups are logged at
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Looks up `key` and logs the result
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = self.inner.get_value(key);
        self.log_lookup(key, value.as_deref());
        value
    }

    /// Sources of the wrapped configuration
    pub fn get_sources(&self) -> Arc<Vec<SharedSource>> {
        self.inner.get_sources()
    }

    /// The wrapped configuration
    pub fn inner(&self) -> &Arc<Config> {
        &self.inner
    }

    /// Closes the wrapped configuration
    pub fn close(&self) {
        self.inner.close();
    }

    fn log_lookup(&self, key: &str, value: Option<&str>) {
        if is_sensitive(key) {
            return;
        }

        let shown = value
            .map(|v| self.inner.filter_value_for_log(key, v))
            .unwrap_or_else(|| "<none>".to_string());

        let level = self.level;
        if level == Level::ERROR {
            tracing::error!(key = %key, value = %shown, "Config lookup");
        } else if level == Level::WARN {
            tracing::warn!(key = %key, value = %shown, "Config lookup");
        } else if level == Level::INFO {
            tracing::info!(key = %key, value = %shown, "Config lookup");
        } else if level == Level::DEBUG {
            tracing::debug!(key = %key, value = %shown, "Config lookup");
        } else {
            tracing::trace!(key = %key, value = %shown, "Config lookup");
        }
    }
}

/// Whether values of `key` must stay out of logs
pub fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}
