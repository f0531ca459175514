//! Secret configuration values
//!
//! Values read through [`Config::get_secret`](super::Config::get_secret) are
//! wrapped in a `secrecy` container: their memory is zeroed on drop, `Debug`
//! output is redacted and reading them requires an explicit
//! `expose_secret()` call.
//!
//! # Example
//!
//! ```rust
//! use strata::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("s3cr3t".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "s3cr3t");
//! assert!(!format!("{token:?}").contains("s3cr3t"));
//! ```

use secrecy::{DebugSecret, Secret};
use zeroize::Zeroize;

/// String payload that is zeroed on drop
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A configuration value that must not leak into logs
pub type SecretString = Secret<SecretValue>;

/// Wraps a value as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
