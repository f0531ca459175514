//! Built-in converters for common scalar types

use super::{Converter, ConverterRegistration};
use anyhow::Context;

/// `true`, `1`, `yes`, `y` and `on` (any case) are `true`, everything else
/// is `false`
pub struct BooleanConverter;

impl Converter<bool> for BooleanConverter {
    fn convert(&self, value: &str) -> anyhow::Result<bool> {
        let value = value.trim();
        Ok(["true", "1", "yes", "y", "on"]
            .iter()
            .any(|accepted| value.eq_ignore_ascii_case(accepted)))
    }
}

/// Parses `i32`
pub struct IntegerConverter;

impl Converter<i32> for IntegerConverter {
    fn convert(&self, value: &str) -> anyhow::Result<i32> {
        value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a valid integer"))
    }
}

/// Parses `i64`
pub struct LongConverter;

impl Converter<i64> for LongConverter {
    fn convert(&self, value: &str) -> anyhow::Result<i64> {
        value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a valid long"))
    }
}

/// Parses `f32`
pub struct FloatConverter;

impl Converter<f32> for FloatConverter {
    fn convert(&self, value: &str) -> anyhow::Result<f32> {
        value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a valid float"))
    }
}

/// Parses `f64`
pub struct DoubleConverter;

impl Converter<f64> for DoubleConverter {
    fn convert(&self, value: &str) -> anyhow::Result<f64> {
        value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a valid double"))
    }
}

/// Identity converter for `String`
pub struct StringConverter;

impl Converter<String> for StringConverter {
    fn convert(&self, value: &str) -> anyhow::Result<String> {
        Ok(value.to_string())
    }
}

/// Registrations for every built-in converter
pub fn registrations() -> Vec<ConverterRegistration> {
    vec![
        ConverterRegistration::of::<bool, _>(BooleanConverter),
        ConverterRegistration::of::<i32, _>(IntegerConverter),
        ConverterRegistration::of::<i64, _>(LongConverter),
        ConverterRegistration::of::<f32, _>(FloatConverter),
        ConverterRegistration::of::<f64, _>(DoubleConverter),
        ConverterRegistration::of::<String, _>(StringConverter),
    ]
}
