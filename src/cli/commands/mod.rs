//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod get;
pub mod list;
pub mod sources;
