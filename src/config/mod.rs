//! Configuration facade, assembly and per-scope registry.
//!
//! # Overview
//!
//! A [`Config`] answers lookups from an ordered set of property sources:
//! - Sources are consulted by descending ordinal, the first match wins
//! - Values pass through the filter chain before they are returned
//! - Typed lookups go through the converter registry
//! - [`Config::access`] starts a cacheable lookup with defaults and
//!   `${name}` interpolation
//!
//! # Quick Start
//!
//! ```rust
//! use strata::config::ConfigBuilder;
//! use strata::source::MapSource;
//! use std::time::Duration;
//!
//! # fn example() -> strata::domain::Result<()> {
//! let config = ConfigBuilder::new()
//!     .ignore_default_sources()
//!     .with_source(
//!         MapSource::new("app")
//!             .with_property("db.host", "db.internal")
//!             .with_property("db.url", "postgres://${db.host}/orders"),
//!     )
//!     .build()?;
//!
//! let mut url = config
//!     .access("db.url")
//!     .evaluate_variables(true)
//!     .cache_for(Duration::from_secs(30));
//! assert_eq!(url.get_value()?.as_deref(), Some("postgres://db.internal/orders"));
//!
//! let mut pool = config.access("db.pool.size").as_type::<i32>().with_default(10);
//! assert_eq!(pool.get_value()?, Some(10));
//! # Ok(())
//! # }
//! ```
//!
//! # Scopes
//!
//! A [`ConfigProvider`] keeps one configuration per [`ScopeId`](crate::domain::ScopeId).
//! While a configuration resolves a value it enters its scope on the
//! calling thread, see [`context`].

pub mod builder;
pub mod context;
pub mod facade;
pub mod logged;
pub mod provider;
pub mod secret;

// Re-export commonly used types
pub use builder::{ConfigBuilder, ConfigRegistrar};
pub use context::{current_scope, ScopeGuard};
pub use facade::Config;
pub use logged::LoggedConfig;
pub use provider::ConfigProvider;
pub use secret::{secret_string, SecretString, SecretValue};
