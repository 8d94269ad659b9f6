use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_bytes;

/// A virtual-network peer identity as returned by the listing endpoint.
///
/// Only `id`, `name`, and `enabled` are guaranteed; the remaining fields
/// depend on the wg-easy version and the peer's traffic history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "publicKey", default)]
    pub public_key: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "latestHandshakeAt", default)]
    pub latest_handshake_at: Option<DateTime<Utc>>,
    #[serde(rename = "transferRx", default)]
    pub transfer_rx: Option<i64>,
    #[serde(rename = "transferTx", default)]
    pub transfer_tx: Option<i64>,
}

impl Peer {
    pub fn status_marker(&self) -> &'static str {
        if self.enabled {
            "enabled"
        } else {
            "disabled"
        }
    }

    /// Transfer counters for display, when the server reported any.
    pub fn display_transfer(&self) -> Option<String> {
        match (self.transfer_rx, self.transfer_tx) {
            (None, None) => None,
            (rx, tx) => Some(format!(
                "rx {} / tx {}",
                format_bytes(rx.unwrap_or(0)),
                format_bytes(tx.unwrap_or(0))
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_peer_listing() {
        let json = r#"[
            {
                "id": "721f6ac2-ab4f-43f7-9824-a743a715f8f2",
                "name": "laptop",
                "enabled": true,
                "address": "10.8.0.2",
                "publicKey": "aBcDeF+g=",
                "createdAt": "2024-01-15T10:00:00.000Z",
                "updatedAt": "2024-01-15T10:00:00.000Z",
                "transferRx": 1048576,
                "transferTx": 2048
            },
            {"id": "2", "name": "phone", "enabled": false}
        ]"#;

        let peers: Vec<Peer> = serde_json::from_str(json).expect("listing should parse");
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].name, "laptop");
        assert_eq!(peers[0].status_marker(), "enabled");
        assert_eq!(
            peers[0].display_transfer().as_deref(),
            Some("rx 1.0 MiB / tx 2.0 KiB")
        );

        assert_eq!(peers[1].status_marker(), "disabled");
        assert_eq!(peers[1].display_transfer(), None);
    }
}
