//! `oauth-token`: refresh the access token and print the `Authorization` value.

use anyhow::{Context, Result};
use secrecy::ExposeSecret;

use super::Clients;

pub async fn run(clients: &Clients) -> Result<()> {
    let tokens = clients.tokens();
    let current = tokens.authorization();
    let fresh = tokens
        .refresh(current.as_ref())
        .await
        .context("Failed to refresh the access token")?;

    println!("{}", fresh.expose_secret());
    Ok(())
}
