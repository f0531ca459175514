//! List command implementation
//!
//! This module implements the `list` command for printing the merged
//! properties of every scannable source.

use crate::config::Config;
use clap::Args;
use std::collections::BTreeMap;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print a JSON object instead of `key = value` lines
    #[arg(long)]
    pub json: bool,

    /// Print values as resolved instead of as they would be logged
    #[arg(long)]
    pub reveal: bool,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, config: &Config) -> anyhow::Result<i32> {
        let output = self.render(config)?;
        if !output.is_empty() {
            println!("{output}");
        }
        Ok(0)
    }

    /// Renders the property listing
    pub fn render(&self, config: &Config) -> anyhow::Result<String> {
        let properties = self.properties(config);
        tracing::debug!(count = properties.len(), "Listing properties");

        if self.json {
            return Ok(serde_json::to_string_pretty(&properties)?);
        }

        Ok(properties
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn properties(&self, config: &Config) -> BTreeMap<String, String> {
        let all = config.get_all_properties();
        if self.reveal {
            return all;
        }

        all.into_iter()
            .map(|(key, value)| {
                let shown = config.filter_value_for_log(&key, &value);
                (key, shown)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::filter::mask::MASK;
    use crate::filter::SecretMaskFilter;
    use crate::source::MapSource;

    fn config() -> Config {
        ConfigBuilder::new()
            .ignore_default_sources()
            .with_source(
                MapSource::new("test")
                    .with_property("db.url", "postgres://db")
                    .with_property("db.password", "hunter2"),
            )
            .with_source(
                MapSource::new("hidden")
                    .with_scannable(false)
                    .with_property("hidden.key", "x"),
            )
            .with_filter(SecretMaskFilter::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_masks_by_default() {
        let list = ListArgs {
            json: false,
            reveal: false,
        };
        let output = list.render(&config()).unwrap();
        assert_eq!(
            output,
            format!("db.password = {MASK}\ndb.url = postgres://db")
        );
    }

    #[test]
    fn test_reveal_and_json() {
        let list = ListArgs {
            json: true,
            reveal: true,
        };
        let output = list.render(&config()).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed.get("db.password"), Some(&"hunter2".to_string()));
        assert!(!parsed.contains_key("hidden.key"));
    }
}
