//! Login command implementation.
//!
//! Responsibilities:
//! - Run the UAA password grant and store the issued tokens in the token cache.
//!
//! Does NOT handle:
//! - Org/space targeting.

use anyhow::{Context, Result};
use tracing::info;

use super::{Clients, secret};

pub async fn run(clients: &Clients, username: &str, password: String) -> Result<()> {
    let uaa = clients.uaa().context("Cannot log in")?;
    info!(uaa = %uaa.url(), username, "Authenticating");

    clients
        .login(username, &secret(password))
        .await
        .context("Failed to log in")?;

    println!("Authenticated as {}.", username);
    Ok(())
}
