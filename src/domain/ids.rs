//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the scope used when no scope has been entered on the current thread
pub const DEFAULT_SCOPE: &str = "default";

/// Scope identifier newtype wrapper
///
/// A scope owns at most one registered configuration. Applications usually
/// use one scope per process, plugins or tenants get their own.
///
/// # Examples
///
/// ```
/// use strata::domain::ids::ScopeId;
/// use std::str::FromStr;
///
/// let scope = ScopeId::from_str("billing-service").unwrap();
/// assert_eq!(scope.as_str(), "billing-service");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a new ScopeId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ScopeId)` if the name is not blank, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Scope ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// The scope used when nothing more specific was requested
    pub fn default_scope() -> Self {
        Self(DEFAULT_SCOPE.to_string())
    }

    /// Returns the scope ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::default_scope()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScopeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ScopeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_id_creation() {
        let id = ScopeId::new("orders").unwrap();
        assert_eq!(id.as_str(), "orders");
    }

    #[test]
    fn test_scope_id_empty_fails() {
        assert!(ScopeId::new("").is_err());
        assert!(ScopeId::new("   ").is_err());
    }

    #[test]
    fn test_scope_id_default() {
        assert_eq!(ScopeId::default().as_str(), DEFAULT_SCOPE);
    }

    #[test]
    fn test_scope_id_display() {
        let id = ScopeId::new("orders").unwrap();
        assert_eq!(format!("{}", id), "orders");
    }

    #[test]
    fn test_scope_id_serialization() {
        let id = ScopeId::new("orders").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ScopeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
