//! Create-user command implementation.
//!
//! Invariants:
//! - Users of the `uaa` origin need a password; external origins must not have one.

use anyhow::{Context, Result, bail};
use tracing::info;

use super::{Clients, secret};
use crate::args::OutputFormat;
use crate::formatters::{get_formatter, output_result};
use cf_client::client::DEFAULT_USER_ORIGIN;

pub async fn run(
    clients: &Clients,
    username: &str,
    password: Option<String>,
    origin: &str,
    format: OutputFormat,
) -> Result<()> {
    if origin == DEFAULT_USER_ORIGIN && password.is_none() {
        bail!("A password is required for users of the '{}' origin", DEFAULT_USER_ORIGIN);
    }

    let uaa = clients.uaa().context("Cannot create user")?;
    info!(username, origin, "Creating user");

    let password = password.map(secret);
    let user = uaa
        .create_user(username, password.as_ref(), origin)
        .await
        .with_context(|| format!("Failed to create user '{}'", username))?;

    output_result(&get_formatter(format).format_user(&user)?);
    Ok(())
}
