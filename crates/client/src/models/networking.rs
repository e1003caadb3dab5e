//! Container networking policy models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ports {
    pub start: u16,
    pub end: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySource {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDestination {
    pub id: String,
    pub protocol: String,
    pub ports: Ports,
}

/// Allows traffic from the source app to the destination app's ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub source: PolicySource,
    pub destination: PolicyDestination,
}

impl Policy {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        protocol: impl Into<String>,
        ports: Ports,
    ) -> Self {
        Self {
            source: PolicySource { id: source.into() },
            destination: PolicyDestination {
                id: destination.into(),
                protocol: protocol.into(),
                ports,
            },
        }
    }
}

/// Envelope used by the policy endpoints in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyList {
    #[serde(default)]
    pub policies: Vec<Policy>,
}
