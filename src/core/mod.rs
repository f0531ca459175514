//! Value resolution for Strata.
//!
//! # Modules
//!
//! - [`accessor`] - Fluent per-key lookups with caching, defaults and change logging
//! - [`interpolation`] - `${name}` substitution with cycle and depth guards
//!
//! # Resolution
//!
//! Each [`ValueAccessor::get_value`](accessor::ValueAccessor::get_value) call:
//!
//! 1. **Cache check**: return the last value while it is fresh
//! 2. **Lookup**: ask the configuration for the filtered raw string
//! 3. **Interpolate** (optional): substitute `${name}` references
//! 4. **Convert**: turn the string into the target type
//! 5. **Default**: substitute the default for absent or empty values
//! 6. **Log** (optional): report a changed value through the log filters
//! 7. **Store**: remember the value and its expiry

pub mod accessor;
pub mod interpolation;

pub use accessor::ValueAccessor;
