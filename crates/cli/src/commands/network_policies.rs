//! Network policies command implementation.
//!
//! Responsibilities:
//! - List, add and remove container-to-container policies.
//!
//! Does NOT handle:
//! - Resolving app names to GUIDs; apps are addressed by GUID.
//!
//! Invariants:
//! - Port ranges are `PORT` or `START-END` with START <= END.

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use super::Clients;
use crate::args::OutputFormat;
use crate::formatters::{get_formatter, output_result};
use cf_client::{Policy, Ports};

#[derive(Debug, Subcommand)]
pub enum NetworkPoliciesCommand {
    /// List policies, optionally only those involving the given apps
    List {
        /// App GUIDs to filter by
        app_guids: Vec<String>,
    },
    /// Allow traffic from one app to another
    Add {
        /// Source app GUID
        source: String,
        /// Destination app GUID
        destination: String,
        /// Protocol (tcp or udp)
        #[arg(long, default_value = "tcp")]
        protocol: String,
        /// Port or port range (e.g., 8080 or 8080-8090)
        #[arg(long, default_value = "8080")]
        port: String,
    },
    /// Remove a policy
    Remove {
        /// Source app GUID
        source: String,
        /// Destination app GUID
        destination: String,
        /// Protocol (tcp or udp)
        #[arg(long, default_value = "tcp")]
        protocol: String,
        /// Port or port range (e.g., 8080 or 8080-8090)
        #[arg(long, default_value = "8080")]
        port: String,
    },
}

pub async fn run(
    clients: &Clients,
    command: NetworkPoliciesCommand,
    format: OutputFormat,
) -> Result<()> {
    let networking = clients.networking().context("Cannot manage network policies")?;

    match command {
        NetworkPoliciesCommand::List { app_guids } => {
            let policies = networking
                .list_policies(&app_guids)
                .await
                .context("Failed to list network policies")?;
            output_result(&get_formatter(format).format_policies(&policies)?);
        }
        NetworkPoliciesCommand::Add {
            source,
            destination,
            protocol,
            port,
        } => {
            let policy = Policy::new(source, destination, protocol, parse_ports(&port)?);
            networking
                .create_policies(vec![policy])
                .await
                .context("Failed to add network policy")?;
            println!("Policy added.");
        }
        NetworkPoliciesCommand::Remove {
            source,
            destination,
            protocol,
            port,
        } => {
            let policy = Policy::new(source, destination, protocol, parse_ports(&port)?);
            networking
                .remove_policies(vec![policy])
                .await
                .context("Failed to remove network policy")?;
            println!("Policy removed.");
        }
    }
    Ok(())
}

fn parse_ports(value: &str) -> Result<Ports> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u16>()
            .with_context(|| format!("Invalid port '{}'", part.trim()))
    };
    let (start, end) = match value.split_once('-') {
        Some((start, end)) => (parse(start)?, parse(end)?),
        None => {
            let port = parse(value)?;
            (port, port)
        }
    };
    if start > end {
        bail!("Invalid port range '{}': start is greater than end", value);
    }
    Ok(Ports { start, end })
}
