// Strata - Layered Property Resolution
// Copyright (c) 2025 Strata Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use strata::cli::{Cli, Commands, LOG_FORMAT_KEY, LOG_LEVEL_KEY};
use strata::config::Config;
use strata::domain::StrataError;
use strata::logging::{init_logging, LogFormat};

fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = match cli.build_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2); // Configuration error exit code
        }
    };

    // Flags win over settings read through the engine itself
    let (log_level, log_format) = match logging_settings(&cli, &config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };
    if let Err(e) = init_logging(&log_level, log_format) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(5);
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        scope = %config.scope(),
        sources = config.get_sources().len(),
        "Strata - Layered Property Resolution"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<StrataError>() {
                Some(strata_error) if strata_error.is_setup_error() => 2,
                _ => 5, // Fatal error exit code
            }
        }
    };

    config.close();

    // Exit with appropriate code
    process::exit(exit_code);
}

/// Resolve the log level and format
fn logging_settings(cli: &Cli, config: &Config) -> strata::domain::Result<(String, LogFormat)> {
    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None => config
            .access(LOG_LEVEL_KEY)
            .with_string_default("warn")?
            .get_value()?
            .unwrap_or_else(|| "warn".to_string()),
    };

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        match config.access(LOG_FORMAT_KEY).get_value()? {
            Some(format) => format.parse()?,
            None => LogFormat::Human,
        }
    };

    Ok((level, format))
}

/// Execute the CLI command
fn execute_command(cli: &Cli, config: &Config) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Get(args) => args.execute(config),
        Commands::List(args) => args.execute(config),
        Commands::Sources(args) => args.execute(config),
    }
}
