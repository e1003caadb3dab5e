//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build the client configuration (see `config_from_cli` in `main`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "cf-rs")]
#[command(about = "Talk to Cloud Foundry APIs through the authenticated connection pipeline", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  cf-rs --api https://api.example.com login -u admin -p secret\n  cf-rs curl /v2/apps\n  cf-rs curl -X POST /v3/spaces -d '{\"name\":\"dev\"}'\n  cf-rs router-groups --name default-tcp\n  CF_TRACE=true cf-rs api-info\n"
)]
pub struct Cli {
    /// Cloud Controller API endpoint (e.g., https://api.example.com)
    #[arg(short, long = "api", global = true, env = "CF_API")]
    pub api_url: Option<String>,

    /// UAA endpoint (discovered from the API when unset)
    #[arg(long, global = true, env = "CF_UAA_URL")]
    pub uaa_url: Option<String>,

    /// Routing API endpoint (discovered from the API when unset)
    #[arg(long, global = true, env = "CF_ROUTING_API")]
    pub routing_api: Option<String>,

    /// Policy server endpoint (defaults to the API endpoint)
    #[arg(long, global = true, env = "CF_NETWORKING_API")]
    pub networking_api: Option<String>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true)]
    pub skip_ssl_validation: bool,

    /// Dial timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries for transient failures
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    /// Request log destination: 'true' for the terminal, or a file path
    #[arg(long, global = true, value_name = "DEST")]
    pub trace: Option<String>,

    /// Directory holding the token cache (defaults to the user config directory)
    #[arg(long, global = true, env = "CF_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// OTLP collector endpoint for exporting spans (e.g., http://localhost:4317)
    #[arg(long, global = true, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Service name reported to the OTLP collector
    #[arg(long, global = true, env = "OTEL_SERVICE_NAME")]
    pub otel_service_name: Option<String>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9464)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a UAA username and password and store the tokens
    Login {
        /// UAA username
        #[arg(short, long, env = "CF_USERNAME")]
        username: String,

        /// UAA password
        #[arg(short, long, env = "CF_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Refresh the access token and print it
    OauthToken,

    /// Send an arbitrary authenticated request to the Cloud Controller
    Curl {
        /// Path relative to the API root, with an optional query (e.g., /v2/apps?q=name:x)
        path: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },

    /// List router groups
    RouterGroups {
        /// Show only the group with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a UAA user
    CreateUser {
        /// Username of the new user
        username: String,

        /// Password (omit for users of an external origin)
        password: Option<String>,

        /// Identity provider origin
        #[arg(long, default_value = cf_client::client::DEFAULT_USER_ORIGIN)]
        origin: String,
    },

    /// Manage container networking policies
    NetworkPolicies {
        #[command(subcommand)]
        command: commands::network_policies::NetworkPoliciesCommand,
    },

    /// Show the API version and component endpoints
    ApiInfo,
}
