//! TOML file property source
//!
//! Nested tables are flattened into dotted keys:
//!
//! ```toml
//! config_ordinal = 150
//!
//! [db]
//! url = "postgres://localhost/app"
//! pool = { size = 8 }
//! hosts = ["a", "b"]
//! ```
//!
//! yields `config_ordinal = 150`, `db.url`, `db.pool.size = 8` and
//! `db.hosts = a,b`.

use super::{PropertySource, DEFAULT_ORDINAL};
use crate::domain::errors::StrataError;
use crate::domain::result::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Top-level key that overrides the ordinal of a TOML source
pub const ORDINAL_KEY: &str = "config_ordinal";

/// Immutable property source loaded from a TOML document
#[derive(Debug, Clone)]
pub struct TomlSource {
    name: String,
    ordinal: i32,
    properties: HashMap<String, String>,
}

impl TomlSource {
    /// Parses `contents` into a source called `name`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Source`] if the document is not valid TOML or
    /// `config_ordinal` is not an integer in `i32` range.
    pub fn from_str(name: impl Into<String>, contents: &str) -> Result<Self> {
        let table: ::toml::Table = contents.parse()?;

        let ordinal = match table.get(ORDINAL_KEY) {
            None => DEFAULT_ORDINAL,
            Some(::toml::Value::Integer(n)) => i32::try_from(*n).map_err(|_| {
                StrataError::Source(format!("{ORDINAL_KEY} out of range: {n}"))
            })?,
            Some(other) => {
                return Err(StrataError::Source(format!(
                    "{ORDINAL_KEY} must be an integer, got {}",
                    other.type_str()
                )))
            }
        };

        let mut properties = HashMap::new();
        flatten_into("", &table, &mut properties);

        Ok(Self {
            name: name.into(),
            ordinal,
            properties,
        })
    }

    /// Loads a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            StrataError::Source(format!(
                "Failed to read property file {}: {}",
                path.display(),
                e
            ))
        })?;

        let source = Self::from_str(format!("toml:{}", path.display()), &contents)?;
        tracing::debug!(
            path = %path.display(),
            properties = source.properties.len(),
            ordinal = source.ordinal,
            "Loaded TOML property source"
        );
        Ok(source)
    }

    /// Loads a TOML file, returning `None` if it does not exist
    pub fn from_optional_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Optional property file not found");
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// Overrides the ordinal, including one declared in the document
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }
}

fn flatten_into(prefix: &str, table: &::toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            ::toml::Value::Table(nested) => flatten_into(&full_key, nested, out),
            other => {
                out.insert(full_key, scalar_to_string(other));
            }
        }
    }
}

fn scalar_to_string(value: &::toml::Value) -> String {
    match value {
        ::toml::Value::String(s) => s.clone(),
        ::toml::Value::Integer(n) => n.to_string(),
        ::toml::Value::Float(f) => f.to_string(),
        ::toml::Value::Boolean(b) => b.to_string(),
        ::toml::Value::Datetime(dt) => dt.to_string(),
        ::toml::Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        ::toml::Value::Table(t) => t.to_string(),
    }
}

impl PropertySource for TomlSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.properties.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = r#"
name = "orders"

[db]
url = "postgres://localhost/app"
hosts = ["a", "b"]
ratio = 0.5
enabled = true

[db.pool]
size = 8
"#;

    #[test]
    fn test_flattening() {
        let source = TomlSource::from_str("doc", DOC).unwrap();
        assert_eq!(source.get_value("name"), Some("orders".to_string()));
        assert_eq!(
            source.get_value("db.url"),
            Some("postgres://localhost/app".to_string())
        );
        assert_eq!(source.get_value("db.pool.size"), Some("8".to_string()));
        assert_eq!(source.get_value("db.hosts"), Some("a,b".to_string()));
        assert_eq!(source.get_value("db.ratio"), Some("0.5".to_string()));
        assert_eq!(source.get_value("db.enabled"), Some("true".to_string()));
        assert_eq!(source.get_value("db"), None);
        assert_eq!(source.get_properties().len(), 6);
    }

    #[test]
    fn test_default_ordinal() {
        let source = TomlSource::from_str("doc", DOC).unwrap();
        assert_eq!(source.ordinal(), DEFAULT_ORDINAL);
        assert_eq!(source.with_ordinal(3).ordinal(), 3);
    }

    #[test]
    fn test_declared_ordinal() {
        let source = TomlSource::from_str("doc", "config_ordinal = 250\nkey = 1").unwrap();
        assert_eq!(source.ordinal(), 250);
        assert_eq!(source.get_value(ORDINAL_KEY), Some("250".to_string()));
    }

    #[test]
    fn test_invalid_ordinal() {
        assert!(TomlSource::from_str("doc", "config_ordinal = \"high\"").is_err());
        assert!(TomlSource::from_str("doc", "config_ordinal = 99999999999").is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let result = TomlSource::from_str("doc", "invalid = toml = syntax");
        assert!(matches!(result, Err(StrataError::Source(_))));
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(DOC.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let source = TomlSource::from_file(temp_file.path()).unwrap();
        assert!(source.name().starts_with("toml:"));
        assert_eq!(source.get_value("db.pool.size"), Some("8".to_string()));
    }

    #[test]
    fn test_missing_files() {
        assert!(TomlSource::from_file("nonexistent.toml").is_err());
        assert!(TomlSource::from_optional_file("nonexistent.toml")
            .unwrap()
            .is_none());
    }
}
