//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Render API results as human-readable text or pretty-printed JSON.
//!
//! Does NOT handle:
//! - Printing (returns formatted strings; see `output_result`).
//!
//! Invariants:
//! - JSON output is always valid JSON, `[]` for empty lists.
//! - Text output prints a human message for empty lists.
//! - Missing values render as `N/A` in text output.

use anyhow::Result;
use cf_client::{ApiInfo, Policy, RouterGroup, UaaUser};

use crate::args::OutputFormat;

/// Placeholder for absent optional values in text output.
const DEFAULT_MISSING_VALUE: &str = "N/A";

pub trait Formatter {
    fn format_api_info(&self, info: &ApiInfo) -> Result<String>;
    fn format_router_groups(&self, groups: &[RouterGroup]) -> Result<String>;
    fn format_policies(&self, policies: &[Policy]) -> Result<String>;
    fn format_user(&self, user: &UaaUser) -> Result<String>;
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Print formatted output to stdout.
pub fn output_result(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_api_info(&self, info: &ApiInfo) -> Result<String> {
        Ok(serde_json::to_string_pretty(info)?)
    }

    fn format_router_groups(&self, groups: &[RouterGroup]) -> Result<String> {
        Ok(serde_json::to_string_pretty(groups)?)
    }

    fn format_policies(&self, policies: &[Policy]) -> Result<String> {
        Ok(serde_json::to_string_pretty(policies)?)
    }

    fn format_user(&self, user: &UaaUser) -> Result<String> {
        Ok(serde_json::to_string_pretty(user)?)
    }
}

pub struct TextFormatter;

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(DEFAULT_MISSING_VALUE)
}

impl Formatter for TextFormatter {
    fn format_api_info(&self, info: &ApiInfo) -> Result<String> {
        let rows = [
            ("API version:", Some(info.api_version.as_str())),
            ("Authorization endpoint:", Some(info.authorization_endpoint.as_str())),
            ("Token endpoint:", Some(info.token_endpoint.as_str())),
            ("Routing endpoint:", info.routing_endpoint.as_deref()),
            ("Min CLI version:", info.min_cli_version.as_deref()),
        ];
        let mut out = String::new();
        for (label, value) in rows {
            out.push_str(&format!("{:<24}{}\n", label, or_missing(value)));
        }
        Ok(out)
    }

    fn format_router_groups(&self, groups: &[RouterGroup]) -> Result<String> {
        if groups.is_empty() {
            return Ok("No router groups found.".to_string());
        }
        let mut out = String::from("name\ttype\treservable ports\tguid\n");
        for group in groups {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                group.name,
                group.router_type,
                or_missing(Some(&group.reservable_ports)),
                group.guid
            ));
        }
        Ok(out)
    }

    fn format_policies(&self, policies: &[Policy]) -> Result<String> {
        if policies.is_empty() {
            return Ok("No policies found.".to_string());
        }
        let mut out = String::from("source\tdestination\tprotocol\tports\n");
        for policy in policies {
            let ports = policy.destination.ports;
            let ports = if ports.start == ports.end {
                ports.start.to_string()
            } else {
                format!("{}-{}", ports.start, ports.end)
            };
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                policy.source.id, policy.destination.id, policy.destination.protocol, ports
            ));
        }
        Ok(out)
    }

    fn format_user(&self, user: &UaaUser) -> Result<String> {
        Ok(format!(
            "Created user {} (id {}, origin {})",
            or_missing(Some(&user.username)),
            user.id,
            or_missing(Some(&user.origin))
        ))
    }
}
