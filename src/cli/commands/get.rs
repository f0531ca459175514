//! Get command implementation
//!
//! This module implements the `get` command, which resolves one property
//! through a value accessor.

use crate::config::Config;
use clap::{Args, ValueEnum};
use std::fmt::Display;

/// Target type of a `get` lookup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    #[default]
    String,
    Bool,
    Int,
    Long,
    Float,
    Double,
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Property key
    pub key: String,

    /// Type to convert the value to
    #[arg(long = "type", value_enum, default_value_t = ValueType::String)]
    pub value_type: ValueType,

    /// Value used when the key is absent or empty
    #[arg(long)]
    pub default: Option<String>,

    /// Print `${name}` references without substituting them
    #[arg(long)]
    pub no_eval: bool,
}

impl GetArgs {
    /// Execute the get command
    ///
    /// Returns exit code 1 when the key has no value.
    pub fn execute(&self, config: &Config) -> anyhow::Result<i32> {
        tracing::debug!(key = %self.key, value_type = ?self.value_type, "Resolving property");

        match self.resolve(config)? {
            Some(value) => {
                println!("{value}");
                Ok(0)
            }
            None => {
                eprintln!("{}: not set", self.key);
                Ok(1)
            }
        }
    }

    /// Resolves the key and renders the converted value
    pub fn resolve(&self, config: &Config) -> anyhow::Result<Option<String>> {
        match self.value_type {
            ValueType::String => self.lookup::<String>(config),
            ValueType::Bool => self.lookup::<bool>(config),
            ValueType::Int => self.lookup::<i32>(config),
            ValueType::Long => self.lookup::<i64>(config),
            ValueType::Float => self.lookup::<f32>(config),
            ValueType::Double => self.lookup::<f64>(config),
        }
    }

    fn lookup<T>(&self, config: &Config) -> anyhow::Result<Option<String>>
    where
        T: Clone + PartialEq + Display + 'static,
    {
        let mut accessor = config
            .access(self.key.as_str())
            .evaluate_variables(!self.no_eval)
            .as_type::<T>();
        if let Some(default) = &self.default {
            accessor = accessor.with_string_default(default)?;
        }

        Ok(accessor.get_value()?.map(|value| value.to_string()))
    }
}
