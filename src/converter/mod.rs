//! Typed value converters
//!
//! A converter turns the raw string of a property into a typed value. The
//! [`ConverterRegistry`] keeps exactly one converter per target type: a new
//! converter replaces the registered one only if its priority is strictly
//! higher.
//!
//! # Example
//!
//! ```rust
//! use strata::converter::{Converter, ConverterRegistry};
//! use std::time::Duration;
//!
//! struct SecondsConverter;
//!
//! impl Converter<Duration> for SecondsConverter {
//!     fn convert(&self, value: &str) -> anyhow::Result<Duration> {
//!         Ok(Duration::from_secs(value.trim().parse()?))
//!     }
//! }
//!
//! let registry = ConverterRegistry::new();
//! registry.add_converter::<Duration, _>(SecondsConverter);
//!
//! let timeout = registry.convert::<Duration>("http.timeout", Some("30")).unwrap();
//! assert_eq!(timeout, Some(Duration::from_secs(30)));
//! ```

pub mod builtin;
pub mod registry;

pub use registry::ConverterRegistry;

use crate::domain::errors::StrataError;
use crate::domain::result::Result;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Priority of converters that do not declare one
pub const DEFAULT_PRIORITY: i32 = 100;

/// Converts a raw property string into a `T`
pub trait Converter<T>: Send + Sync {
    /// Converts `value`
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid representation of `T`.
    fn convert(&self, value: &str) -> anyhow::Result<T>;

    /// Priority used when two converters target the same type. Higher wins.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }
}

impl<T, F> Converter<T> for F
where
    F: Fn(&str) -> anyhow::Result<T> + Send + Sync,
{
    fn convert(&self, value: &str) -> anyhow::Result<T> {
        self(value)
    }
}

/// Wraps a converter with an explicit priority
pub struct Prioritized<C> {
    inner: C,
    priority: i32,
}

impl<C> Prioritized<C> {
    /// Gives `inner` the priority `priority`
    pub fn new(inner: C, priority: i32) -> Self {
        Self { inner, priority }
    }
}

impl<T, C> Converter<T> for Prioritized<C>
where
    C: Converter<T>,
{
    fn convert(&self, value: &str) -> anyhow::Result<T> {
        self.inner.convert(value)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Identity of a converter's target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    /// The target type `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Type name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn id(&self) -> TypeId {
        self.id
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased payload: always an `Arc<dyn Converter<T>>` behind `Any`
pub(crate) type ErasedConverter = Arc<dyn Any + Send + Sync>;

type PayloadCheck = fn(&(dyn Any + Send + Sync)) -> bool;

fn holds_converter_for<T: 'static>(payload: &(dyn Any + Send + Sync)) -> bool {
    payload.is::<Arc<dyn Converter<T>>>()
}

/// A converter waiting to be added to a registry
///
/// Typed registrations built with [`ConverterRegistration::of`] always carry
/// their target type. Registrations produced by plugins may arrive erased and
/// must declare their target with [`declare`](Self::declare) before a
/// registry accepts them.
pub struct ConverterRegistration {
    name: String,
    target: Option<(TargetType, PayloadCheck)>,
    priority: i32,
    converter: ErasedConverter,
}

impl ConverterRegistration {
    /// Registration for a typed converter
    pub fn of<T, C>(converter: C) -> Self
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        let priority = Converter::<T>::priority(&converter);
        let converter: Arc<dyn Converter<T>> = Arc::new(converter);
        Self {
            name: std::any::type_name::<C>().to_string(),
            target: Some((TargetType::of::<T>(), holds_converter_for::<T>)),
            priority,
            converter: Arc::new(converter),
        }
    }

    /// Registration for an erased converter
    ///
    /// `converter` must hold an `Arc<dyn Converter<T>>` for the type later
    /// passed to [`declare`](Self::declare).
    pub fn erased(
        name: impl Into<String>,
        converter: ErasedConverterHandle,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            target: None,
            priority,
            converter: converter.0,
        }
    }

    /// Declares the target type of an erased registration
    pub fn declare<T: 'static>(mut self) -> Self {
        self.target = Some((TargetType::of::<T>(), holds_converter_for::<T>));
        self
    }

    /// Name of the converter, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Priority of the converter
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Declared target type, if any
    pub fn target(&self) -> Option<TargetType> {
        self.target.map(|(target, _)| target)
    }

    /// Checks that the registration names a target type its payload
    /// actually converts to
    pub(crate) fn validate(self) -> Result<ValidatedConverter> {
        let Some((target, check)) = self.target else {
            return Err(StrataError::InvalidConverterDeclaration(format!(
                "converter {} does not declare a target type",
                self.name
            )));
        };

        if !check(self.converter.as_ref()) {
            return Err(StrataError::InvalidConverterDeclaration(format!(
                "converter {} is declared for {} but does not convert to it",
                self.name, target
            )));
        }

        Ok(ValidatedConverter {
            name: self.name,
            target,
            priority: self.priority,
            converter: self.converter,
        })
    }
}

impl fmt::Debug for ConverterRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistration")
            .field("name", &self.name)
            .field("target", &self.target())
            .field("priority", &self.priority)
            .finish()
    }
}

/// Opaque handle used to hand an erased converter across a plugin boundary
pub struct ErasedConverterHandle(ErasedConverter);

impl ErasedConverterHandle {
    /// Erases a converter for `T`
    pub fn new<T: 'static>(converter: Arc<dyn Converter<T>>) -> Self {
        Self(Arc::new(converter))
    }

    /// Wraps an arbitrary payload; registration fails unless it holds an
    /// `Arc<dyn Converter<T>>` for the declared `T`
    pub fn from_any(payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self(payload)
    }
}

/// A registration whose target type has been checked
pub(crate) struct ValidatedConverter {
    pub(crate) name: String,
    pub(crate) target: TargetType,
    pub(crate) priority: i32,
    pub(crate) converter: ErasedConverter,
}
