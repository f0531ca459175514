//! Converter registry keyed by target type

use super::builtin;
use super::{Converter, ConverterRegistration, ErasedConverter, TargetType, ValidatedConverter};
use crate::domain::errors::StrataError;
use crate::domain::result::Result;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
struct Entry {
    name: String,
    target: TargetType,
    priority: i32,
    converter: ErasedConverter,
}

/// Summary of a registered converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterInfo {
    /// Converter name
    pub name: String,
    /// Target type name
    pub target: &'static str,
    /// Priority the converter was registered with
    pub priority: i32,
}

/// One converter per target type
///
/// Lookups read a lock-free snapshot; registrations serialize on a mutex and
/// publish a new map. A converter replaces the registered one for its type
/// only when its priority is strictly higher, so among equal priorities the
/// first registration wins.
pub struct ConverterRegistry {
    converters: ArcSwap<HashMap<TypeId, Entry>>,
    write_lock: Mutex<()>,
}

impl ConverterRegistry {
    /// Creates a registry holding the built-in converters
    pub fn new() -> Self {
        let registry = Self::without_builtins();
        for registration in builtin::registrations() {
            let added = registry.add_registration(registration);
            if let Err(e) = &added {
                tracing::error!(error = %e, "Rejected built-in converter");
            }
            debug_assert!(matches!(added, Ok(true)), "built-in converter not registered");
        }
        registry
    }

    /// Creates an empty registry
    pub fn without_builtins() -> Self {
        Self {
            converters: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Adds a typed converter
    ///
    /// Returns `true` if the converter is now the one used for `T`.
    pub fn add_converter<T, C>(&self, converter: C) -> bool
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        match ConverterRegistration::of::<T, C>(converter).validate() {
            Ok(validated) => self.insert(validated),
            Err(e) => {
                tracing::error!(error = %e, "Rejected typed converter");
                false
            }
        }
    }

    /// Adds a registration, possibly an erased one from a plugin
    ///
    /// Returns `Ok(true)` if the converter is now the one used for its type.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidConverterDeclaration`] if the registration
    /// does not declare a target type it converts to.
    pub fn add_registration(&self, registration: ConverterRegistration) -> Result<bool> {
        let validated = registration.validate()?;
        Ok(self.insert(validated))
    }

    fn insert(&self, candidate: ValidatedConverter) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.converters.load();

        if let Some(existing) = current.get(&candidate.target.id()) {
            if candidate.priority <= existing.priority {
                tracing::debug!(
                    target_type = %candidate.target,
                    converter = %candidate.name,
                    priority = candidate.priority,
                    retained = %existing.name,
                    retained_priority = existing.priority,
                    "Converter not registered, existing converter has equal or higher priority"
                );
                return false;
            }
        }

        tracing::debug!(
            target_type = %candidate.target,
            converter = %candidate.name,
            priority = candidate.priority,
            "Converter registered"
        );

        let mut next = HashMap::clone(&current);
        next.insert(
            candidate.target.id(),
            Entry {
                name: candidate.name,
                target: candidate.target,
                priority: candidate.priority,
                converter: candidate.converter,
            },
        );
        self.converters.store(Arc::new(next));
        true
    }

    /// Returns the converter for `T`
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingConverter`] if none is registered.
    pub fn get<T: 'static>(&self) -> Result<Arc<dyn Converter<T>>> {
        let missing = || StrataError::MissingConverter {
            type_name: std::any::type_name::<T>(),
        };

        let snapshot = self.converters.load();
        let entry = snapshot.get(&TypeId::of::<T>()).ok_or_else(missing)?;
        entry
            .converter
            .downcast_ref::<Arc<dyn Converter<T>>>()
            .cloned()
            .ok_or_else(missing)
    }

    /// Converts an optional raw value read for `key`
    ///
    /// The converter is looked up even when `value` is `None`, so asking for
    /// an unsupported type fails whether or not the key is defined.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingConverter`] if no converter handles `T`,
    /// or [`StrataError::Conversion`] if the converter rejects the value.
    pub fn convert<T: 'static>(&self, key: &str, value: Option<&str>) -> Result<Option<T>> {
        let converter = self.get::<T>()?;
        value
            .map(|raw| {
                converter
                    .convert(raw)
                    .map_err(|e| StrataError::conversion(key, std::any::type_name::<T>(), e))
            })
            .transpose()
    }

    /// Whether a converter for `T` is registered
    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.load().contains_key(&TypeId::of::<T>())
    }

    /// Priority of the converter registered for `T`
    pub fn priority_of<T: 'static>(&self) -> Option<i32> {
        self.converters
            .load()
            .get(&TypeId::of::<T>())
            .map(|entry| entry.priority)
    }

    /// Number of registered converters
    pub fn len(&self) -> usize {
        self.converters.load().len()
    }

    /// Whether no converter is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lists registered converters sorted by target type name
    pub fn registered(&self) -> Vec<ConverterInfo> {
        let mut infos: Vec<ConverterInfo> = self
            .converters
            .load()
            .values()
            .map(|entry| ConverterInfo {
                name: entry.name.clone(),
                target: entry.target.name(),
                priority: entry.priority,
            })
            .collect();
        infos.sort_by(|a, b| a.target.cmp(b.target));
        infos
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
