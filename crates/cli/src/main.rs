//! cf-rs - a small Cloud Foundry command-line client.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Build the API clients (token cache, request logging, wrapper chains).
//! - Execute commands and map failures to structured exit codes.
//!
//! Does NOT handle:
//! - HTTP, authentication or retries (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Command-line flags override `CF_*` environment variables.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use anyhow::{Context, Result};
use args::Cli;
use cf_client::{Clients, MetricsExporter, TracingConfig};
use cf_config::{Config, ConfigLoader, TraceDestination};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::new();
    if let Some(ref endpoint) = cli.otlp_endpoint {
        tracing_config = tracing_config.with_otlp_endpoint(endpoint);
    }
    if let Some(ref name) = cli.otel_service_name {
        tracing_config = tracing_config.with_service_name(name);
    }
    let tracing_guard = match tracing_config.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let metrics_exporter = cli
        .metrics_bind
        .as_deref()
        .map(MetricsExporter::install)
        .transpose();
    let _metrics_exporter = match metrics_exporter {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("Failed to start metrics exporter: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let exit_code = match run(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    tracing_guard.shutdown();
    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> Result<()> {
    let config = config_from_cli(&cli)?;
    let clients = Clients::builder()
        .from_config(&config)
        .build_discovered()
        .await
        .context("Failed to set up API clients")?;

    run_command(cli.command, &clients, cli.output).await
}

/// Layer command-line flags over the environment.
fn config_from_cli(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new()
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(ref url) = cli.api_url {
        loader = loader.with_api_url(url.clone());
    }
    if let Some(ref url) = cli.uaa_url {
        loader = loader.with_uaa_url(url.clone());
    }
    if let Some(ref url) = cli.routing_api {
        loader = loader.with_routing_url(url.clone());
    }
    if let Some(ref url) = cli.networking_api {
        loader = loader.with_networking_url(url.clone());
    }
    if cli.skip_ssl_validation {
        loader = loader.with_skip_ssl_validation(true);
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_dial_timeout(std::time::Duration::from_secs(secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if let Some(ref trace) = cli.trace {
        loader = loader.with_trace(TraceDestination::parse(trace));
    }
    if let Some(ref home) = cli.home {
        loader = loader.with_home_dir(home.clone());
    }

    loader.build().context("Failed to build configuration")
}
