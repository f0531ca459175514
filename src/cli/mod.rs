//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Strata using clap.

pub mod commands;

use crate::config::{Config, ConfigBuilder};
use crate::filter::{Base64Filter, SecretMaskFilter};
use crate::source::{MapSource, TomlSource};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ordinal of properties given with `--set`
pub const OVERRIDE_ORDINAL: i32 = 500;

/// Key read for the log level when `--log-level` is not given
pub const LOG_LEVEL_KEY: &str = "strata.log.level";

/// Key read for the log format when `--json-logs` is not given
pub const LOG_FORMAT_KEY: &str = "strata.log.format";

/// Strata - layered property resolution
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
#[command(author = "Strata Contributors")]
pub struct Cli {
    /// TOML file to add as a property source (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Override a property, e.g. `--set db.port=5433` (repeatable)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,

    /// Do not read properties from the environment
    #[arg(long)]
    pub no_env: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STRATA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single property
    Get(commands::get::GetArgs),

    /// Print every property of the scannable sources
    List(commands::list::ListArgs),

    /// Print the property sources in lookup order
    Sources(commands::sources::SourcesArgs),
}

impl Cli {
    /// Builds the configuration described by the global flags
    ///
    /// Property files are required to exist. Secret-looking keys are masked
    /// in logs and `base64:` values are decoded.
    pub fn build_config(&self) -> anyhow::Result<Config> {
        let mut builder = ConfigBuilder::new()
            .with_filter(Base64Filter::new())
            .with_filter(SecretMaskFilter::new());

        if self.no_env {
            builder = builder.ignore_default_sources();
        }

        for path in &self.files {
            let source = TomlSource::from_file(path)
                .with_context(|| format!("Failed to load property file {}", path.display()))?;
            builder = builder.with_source(source);
        }

        if !self.overrides.is_empty() {
            let overrides = self
                .overrides
                .iter()
                .fold(
                    MapSource::new("command-line").with_ordinal(OVERRIDE_ORDINAL),
                    |source, (key, value)| source.with_property(key.as_str(), value.as_str()),
                );
            builder = builder.with_source(overrides);
        }

        Ok(builder.build()?)
    }
}

/// Parses a `KEY=VALUE` pair; the value may itself contain `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
