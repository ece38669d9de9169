//! Iconforge CLI Binary
//!
//! Command-line interface for themed icon pack generation.

use clap::Parser;
use iconforge::cli::{Cli, RunContext};
use iconforge::config::ConfigLoader;
use iconforge::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Iconforge CLI starting");

    if let Err(e) = run(&cli).await {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<iconforge::ApiError>() {
            Some(api_error) => eprintln!("{}", iconforge::cli::map_error(api_error)),
            None => eprintln!("{:#}", e),
        }
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = RunContext::new(cli.project.clone(), cli.config.clone())?;
    info!("CLI context initialized");

    let output = context.execute(&cli.command).await?;
    info!("Command completed successfully");
    println!("{}", output);
    Ok(())
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_with_file(config_path),
        None => ConfigLoader::load(&cli.project),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
