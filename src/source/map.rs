//! In-memory property source

use super::{PropertySource, DEFAULT_ORDINAL};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Property source backed by an in-memory map
///
/// The map can be changed after the source has been registered, which makes
/// it suitable for runtime overrides (`--set key=value`) and for tests.
pub struct MapSource {
    name: String,
    ordinal: i32,
    scannable: bool,
    properties: RwLock<HashMap<String, String>>,
}

impl MapSource {
    /// Creates an empty, scannable source with the default ordinal
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: DEFAULT_ORDINAL,
            scannable: true,
            properties: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a source holding `properties`
    pub fn from_map(name: impl Into<String>, properties: HashMap<String, String>) -> Self {
        Self {
            properties: RwLock::new(properties),
            ..Self::new(name)
        }
    }

    /// Sets the ordinal
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Sets whether the source takes part in bulk enumeration
    pub fn with_scannable(mut self, scannable: bool) -> Self {
        self.scannable = scannable;
        self
    }

    /// Adds a property
    pub fn with_property(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.write().insert(key.into(), value.into());
        self
    }

    /// Inserts or replaces a property, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.write().insert(key.into(), value.into())
    }

    /// Removes a property, returning its value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.properties.write().remove(key)
    }

    /// Number of properties currently held
    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    /// Whether the source holds no properties
    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }
}

impl PropertySource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.properties.read().get(key).cloned()
    }

    fn get_properties(&self) -> HashMap<String, String> {
        self.properties.read().clone()
    }

    fn is_scannable(&self) -> bool {
        self.scannable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let source = MapSource::new("test")
            .with_ordinal(7)
            .with_scannable(false)
            .with_property("a", "1");

        assert_eq!(source.name(), "test");
        assert_eq!(source.ordinal(), 7);
        assert!(!source.is_scannable());
        assert_eq!(source.get_value("a"), Some("1".to_string()));
        assert_eq!(source.get_value("b"), None);
    }

    #[test]
    fn test_runtime_mutation() {
        let source = MapSource::new("overrides");
        assert!(source.is_empty());

        assert_eq!(source.insert("a", "1"), None);
        assert_eq!(source.insert("a", "2"), Some("1".to_string()));
        assert_eq!(source.get_value("a"), Some("2".to_string()));

        assert_eq!(source.remove("a"), Some("2".to_string()));
        assert_eq!(source.get_value("a"), None);
    }

    #[test]
    fn test_from_map() {
        let map = HashMap::from([
            ("x".to_string(), "1".to_string()),
            ("y".to_string(), "2".to_string()),
        ]);
        let source = MapSource::from_map("map", map.clone());
        assert_eq!(source.len(), 2);
        assert_eq!(source.get_properties(), map);
        assert_eq!(source.ordinal(), DEFAULT_ORDINAL);
    }
}
