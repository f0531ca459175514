//! Domain types for Strata.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ScopeId`])
//! - **Error types** ([`StrataError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StrataError>`]. Keys that are
//! not defined by any source are not errors:
//!
//! ```rust
//! use strata::config::ConfigBuilder;
//! use strata::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = ConfigBuilder::new().ignore_default_sources().build()?;
//!     assert_eq!(config.get_value_as::<i32>("server.port")?, None);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

pub use errors::StrataError;
pub use ids::ScopeId;
pub use result::Result;
