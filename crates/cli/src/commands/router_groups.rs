//! Router groups command implementation.

use anyhow::{Context, Result};

use super::Clients;
use crate::args::OutputFormat;
use crate::formatters::{get_formatter, output_result};

pub async fn run(clients: &Clients, name: Option<&str>, format: OutputFormat) -> Result<()> {
    let router = clients.router().context("Cannot list router groups")?;

    let groups = match name {
        Some(name) => vec![router.router_group_by_name(name).await?],
        None => router.router_groups().await.context("Failed to list router groups")?,
    };

    output_result(&get_formatter(format).format_router_groups(&groups)?);
    Ok(())
}
