//! Sources command implementation
//!
//! This module implements the `sources` command, which shows the property
//! sources in the order lookups consult them.

use crate::config::Config;
use clap::Args;
use serde::Serialize;

/// Arguments for the sources command
#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Print a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One row of the sources listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRow {
    pub name: String,
    pub ordinal: i32,
    pub scannable: bool,
}

impl SourcesArgs {
    /// Execute the sources command
    pub fn execute(&self, config: &Config) -> anyhow::Result<i32> {
        let rows = rows(config);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(0);
        }

        if rows.is_empty() {
            println!("No property sources configured.");
            return Ok(0);
        }

        println!("{:<48} {:>8}  {:<9}", "Source", "Ordinal", "Scannable");
        println!("{}", "-".repeat(68));
        for row in &rows {
            println!(
                "{:<48} {:>8}  {:<9}",
                row.name,
                row.ordinal,
                if row.scannable { "yes" } else { "no" }
            );
        }

        Ok(0)
    }
}

/// Sources of `config` in lookup order
pub fn rows(config: &Config) -> Vec<SourceRow> {
    config
        .get_sources()
        .iter()
        .map(|source| SourceRow {
            name: source.name().to_string(),
            ordinal: source.ordinal(),
            scannable: source.is_scannable(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::source::MapSource;

    #[test]
    fn test_rows_in_lookup_order() {
        let config = ConfigBuilder::new()
            .ignore_default_sources()
            .with_source(MapSource::new("defaults").with_ordinal(10))
            .with_source(
                MapSource::new("secrets")
                    .with_ordinal(400)
                    .with_scannable(false),
            )
            .build()
            .unwrap();

        assert_eq!(
            rows(&config),
            vec![
                SourceRow {
                    name: "secrets".to_string(),
                    ordinal: 400,
                    scannable: false,
                },
                SourceRow {
                    name: "defaults".to_string(),
                    ordinal: 10,
                    scannable: true,
                },
            ]
        );
    }

    #[test]
    fn test_execute_empty() {
        let config = ConfigBuilder::new().ignore_default_sources().build().unwrap();
        let args = SourcesArgs { json: false };
        assert_eq!(args.execute(&config).unwrap(), 0);
    }
}
