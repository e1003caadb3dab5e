//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Building the clients (see `main`).

use anyhow::Result;

use crate::args::{Commands, OutputFormat};
use crate::commands::{self, Clients};

/// Dispatch a parsed subcommand to its handler.
pub(crate) async fn run_command(
    command: Commands,
    clients: &Clients,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            commands::login::run(clients, &username, password).await
        }
        Commands::OauthToken => commands::oauth_token::run(clients).await,
        Commands::Curl { path, method, data } => {
            commands::curl::run(clients, &method, &path, data.as_deref()).await
        }
        Commands::RouterGroups { name } => {
            commands::router_groups::run(clients, name.as_deref(), format).await
        }
        Commands::CreateUser {
            username,
            password,
            origin,
        } => commands::create_user::run(clients, &username, password, &origin, format).await,
        Commands::NetworkPolicies { command } => {
            commands::network_policies::run(clients, command, format).await
        }
        Commands::ApiInfo => commands::api_info::run(clients, format).await,
    }
}
