//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable or JSON-formatted output
//! - Configurable log levels, overridable through `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use strata::logging::{init_logging, LogFormat};
//!
//! init_logging("info", LogFormat::Human).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::warn!(key = "db.url", "No source defines key");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LogFormat};

/// Log a failed release of a source or filter
///
/// # Example
///
/// ```no_run
/// use strata::log_release_failure;
/// use strata::domain::StrataError;
///
/// let error = StrataError::Source("connection reset".to_string());
/// log_release_failure!("property source", "jdbc", &error);
/// ```
#[macro_export]
macro_rules! log_release_failure {
    ($kind:expr, $name:expr, $error:expr) => {
        tracing::warn!(
            kind = $kind,
            name = %$name,
            error = %$error,
            "Failed to release resource"
        );
    };
}

/// Log a configuration value that changed since it was last read
///
/// # Example
///
/// ```no_run
/// use strata::log_value_change;
///
/// log_value_change!("http.port", Some("8080"));
/// log_value_change!("http.port", None::<&str>);
/// ```
#[macro_export]
macro_rules! log_value_change {
    ($key:expr, $value:expr) => {
        tracing::info!(
            key = %$key,
            value = $value.unwrap_or("<none>"),
            "New value for key"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::StrataError;

    #[test]
    fn test_macros_expand() {
        let error = StrataError::Source("gone".to_string());
        log_release_failure!("filter", "base64", &error);
        log_value_change!("k", Some("v"));
        log_value_change!(String::from("k"), None::<&str>);
    }
}
