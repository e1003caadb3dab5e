//! API info command implementation.

use anyhow::{Context, Result};

use super::Clients;
use crate::args::OutputFormat;
use crate::formatters::{get_formatter, output_result};

pub async fn run(clients: &Clients, format: OutputFormat) -> Result<()> {
    let info = clients
        .cloud_controller()
        .context("Cannot fetch API info")?
        .info()
        .await
        .context("Failed to fetch API info")?;

    output_result(&get_formatter(format).format_api_info(&info)?);
    Ok(())
}
