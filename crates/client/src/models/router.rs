//! Routing API models.

use serde::{Deserialize, Serialize};

/// A router group (`/routing/v1/router_groups`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterGroup {
    pub guid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub router_type: String,
    #[serde(default)]
    pub reservable_ports: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_router_group() {
        let group: RouterGroup = serde_json::from_str(
            r#"{"guid":"g-1","name":"default-tcp","type":"tcp","reservable_ports":"1024-1033"}"#,
        )
        .unwrap();
        assert_eq!(group.router_type, "tcp");
        assert_eq!(group.reservable_ports, "1024-1033");
    }
}
