//! Domain error types
//!
//! This module defines the error hierarchy for Strata. Configuration-shape
//! problems (a missing converter, an unusable default, a converter without a
//! target type) are errors; a key that no source knows about is not, and is
//! reported as `None` by the lookup APIs instead.

use thiserror::Error;

/// Main Strata error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum StrataError {
    /// No converter is registered for the requested target type
    #[error("No converter registered for type {type_name}")]
    MissingConverter { type_name: &'static str },

    /// A converter registration does not declare a usable target type
    #[error("Invalid converter declaration: {0}")]
    InvalidConverterDeclaration(String),

    /// An empty string was supplied as a string default
    #[error("Empty string supplied as string-default value for property {key}")]
    InvalidDefault { key: String },

    /// A converter rejected the raw value
    #[error("Cannot convert value of {key} to {type_name}: {message}")]
    Conversion {
        key: String,
        type_name: &'static str,
        message: String,
    },

    /// Builder and registry errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A property source could not be created or read
    #[error("Property source error: {0}")]
    Source(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl StrataError {
    /// Creates a conversion error for `key`
    pub fn conversion(
        key: impl Into<String>,
        type_name: &'static str,
        message: impl std::fmt::Display,
    ) -> Self {
        StrataError::Conversion {
            key: key.into(),
            type_name,
            message: message.to_string(),
        }
    }

    /// Returns true for errors that describe a broken configuration setup
    /// rather than bad data
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            StrataError::MissingConverter { .. }
                | StrataError::InvalidConverterDeclaration(_)
                | StrataError::InvalidDefault { .. }
                | StrataError::Configuration(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        StrataError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StrataError {
    fn from(err: toml::de::Error) -> Self {
        StrataError::Source(format!("TOML parse error: {err}"))
    }
}
