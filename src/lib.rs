// Strata - Layered Property Resolution
// Copyright (c) 2025 Strata Contributors
// Licensed under the MIT License

//! # Strata - Layered Property Resolution
//!
//! Strata resolves configuration properties by merging prioritized sources,
//! converting string values into typed results, filtering values on their
//! way out and caching lookups.
//!
//! ## Overview
//!
//! This library provides:
//! - **Sources** ordered by ordinal: the environment, TOML files, in-memory
//!   maps and anything implementing [`source::PropertySource`]
//! - **Converters** from strings to typed values, one per type, arbitrated
//!   by priority
//! - **Filters** that transform values and mask them in logs
//! - **Accessors** with defaults, `${name}` interpolation, caching and
//!   change logging
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration facade, builder and per-scope provider
//! - [`core`] - Value accessor and variable interpolation
//! - [`source`] - Property sources and the source registry
//! - [`converter`] - Typed converters and the converter registry
//! - [`filter`] - Value filters and the filter chain
//! - [`domain`] - Identifiers, errors and the result type
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use strata::config::ConfigBuilder;
//! use strata::source::MapSource;
//! use std::time::Duration;
//!
//! # fn example() -> strata::domain::Result<()> {
//! let config = ConfigBuilder::new()
//!     .with_source(
//!         MapSource::new("defaults")
//!             .with_ordinal(10)
//!             .with_property("http.port", "8080")
//!             .with_property("http.base", "http://localhost:${http.port}"),
//!     )
//!     .build()?;
//!
//! // HTTP_PORT in the environment (ordinal 300) overrides the default
//! let port = config.get_value_as::<i32>("http.port")?;
//!
//! let mut base = config
//!     .access("http.base")
//!     .evaluate_variables(true)
//!     .cache_for(Duration::from_secs(10));
//! println!("{:?} {:?}", port, base.get_value()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Strata uses the [`domain::StrataError`] type for all errors. A key that
//! no source defines is not an error and comes back as `None`.
//!
//! ## Logging
//!
//! Strata logs through the `tracing` crate. Lookups are logged at `debug`,
//! changed accessor values at `info`, and swallowed release failures at
//! `warn`.

pub mod cli;
pub mod config;
pub mod converter;
pub mod core;
pub mod domain;
pub mod filter;
pub mod logging;
pub mod source;
