//! API client for the wg-easy administration endpoints.
//!
//! Every operation is expressed as "build a request, run it through the
//! session manager, interpret the logical success flag". The operations add
//! no session logic of their own; expiry handling lives entirely in
//! [`SessionManager`].

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::auth::SessionManager;
use crate::config::Config;
use crate::models::Peer;

use super::transport::{HttpTransport, Transport};
use super::ApiError;

/// Peer collection endpoint; wg-easy calls peers "clients" on the wire.
const PEERS_PATH: &str = "/api/wireguard/client";

pub struct WgEasyClient {
    transport: Arc<HttpTransport>,
    session: SessionManager<HttpTransport>,
}

impl WgEasyClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let transport = Arc::new(HttpTransport::new(&config.base_url)?);
        let session = SessionManager::new(Arc::clone(&transport), config.password.clone());
        Ok(Self { transport, session })
    }

    /// Establish a session eagerly. Startup warm-up so the caller can fail
    /// fast on a bad password instead of at the first operation.
    pub async fn ensure_session(&self) -> Result<(), ApiError> {
        self.session.ensure_session().await
    }

    /// Create a new peer with the given name.
    pub async fn create_peer(&self, name: &str) -> Result<(), ApiError> {
        let body = json!({ "name": name });
        self.session
            .run_guarded(|cookie| {
                let body = &body;
                async move {
                    let response = self
                        .transport
                        .send(Method::POST, PEERS_PATH, Some(body), Some(&cookie))
                        .await?;
                    check_success_flag(&response.body)
                }
            })
            .await
    }

    /// Delete a peer by id.
    pub async fn delete_peer(&self, peer_id: &str) -> Result<(), ApiError> {
        let path = format!("{PEERS_PATH}/{peer_id}");
        self.session
            .run_guarded(|cookie| {
                let path = path.as_str();
                async move {
                    let response = self
                        .transport
                        .send(Method::DELETE, path, None, Some(&cookie))
                        .await?;
                    check_success_flag(&response.body)
                }
            })
            .await
    }

    /// Enable a disabled peer.
    pub async fn enable_peer(&self, peer_id: &str) -> Result<(), ApiError> {
        self.toggle_peer(peer_id, "enable").await
    }

    /// Disable a peer without deleting it.
    pub async fn disable_peer(&self, peer_id: &str) -> Result<(), ApiError> {
        self.toggle_peer(peer_id, "disable").await
    }

    async fn toggle_peer(&self, peer_id: &str, action: &str) -> Result<(), ApiError> {
        let path = format!("{PEERS_PATH}/{peer_id}/{action}");
        let body = json!({});
        self.session
            .run_guarded(|cookie| {
                let path = path.as_str();
                let body = &body;
                async move {
                    let response = self
                        .transport
                        .send(Method::POST, path, Some(body), Some(&cookie))
                        .await?;
                    check_success_flag(&response.body)
                }
            })
            .await
    }

    /// Fetch the full peer listing.
    pub async fn list_peers(&self) -> Result<Vec<Peer>, ApiError> {
        self.session
            .run_guarded(|cookie| async move {
                let response = self
                    .transport
                    .send(Method::GET, PEERS_PATH, None, Some(&cookie))
                    .await?;
                serde_json::from_str(&response.body).map_err(|e| {
                    ApiError::InvalidResponse(format!("unreadable peer listing: {e}"))
                })
            })
            .await
    }

    /// Look up a peer id by exact name. Client-side filter over the full
    /// listing; no extra round trip.
    pub async fn peer_id_by_name(&self, name: &str) -> Result<Option<String>, ApiError> {
        let peers = self.list_peers().await?;
        Ok(id_by_name(&peers, name))
    }

    /// Look up all peer ids whose name contains the given fragment.
    pub async fn peer_ids_by_subname(&self, subname: &str) -> Result<Vec<String>, ApiError> {
        let peers = self.list_peers().await?;
        Ok(ids_by_subname(&peers, subname))
    }
}

/// wg-easy wraps write operations in a body carrying a logical success flag;
/// a 2xx status alone does not mean the operation took effect.
fn check_success_flag(body: &str) -> Result<(), ApiError> {
    #[derive(Deserialize)]
    struct Flagged {
        #[serde(default)]
        success: bool,
    }

    let parsed: Flagged = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("unreadable operation response: {e}")))?;
    if parsed.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(
            "the server declined the operation".to_string(),
        ))
    }
}

/// Exact, case-sensitive match on the peer name.
fn id_by_name(peers: &[Peer], name: &str) -> Option<String> {
    peers.iter().find(|p| p.name == name).map(|p| p.id.clone())
}

/// Case-insensitive substring match on the peer name.
fn ids_by_subname(peers: &[Peer], subname: &str) -> Vec<String> {
    let needle = subname.to_lowercase();
    peers
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .map(|p| p.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str, name: &str, enabled: bool) -> Peer {
        Peer {
            id: id.to_string(),
            name: name.to_string(),
            enabled,
            address: None,
            public_key: None,
            created_at: None,
            updated_at: None,
            latest_handshake_at: None,
            transfer_rx: None,
            transfer_tx: None,
        }
    }

    #[test]
    fn test_id_by_name_exact_match() {
        let peers = vec![peer("1", "alice", true), peer("2", "bob", false)];

        assert_eq!(id_by_name(&peers, "bob").as_deref(), Some("2"));
        assert_eq!(id_by_name(&peers, "carol"), None);
        // Exact match only; no substring or case folding here.
        assert_eq!(id_by_name(&peers, "Bob"), None);
        assert_eq!(id_by_name(&peers, "bo"), None);
    }

    #[test]
    fn test_ids_by_subname_substring_match() {
        let peers = vec![peer("1", "alice", true), peer("2", "bob", false)];

        assert_eq!(ids_by_subname(&peers, "a"), vec!["1"]);
        assert_eq!(ids_by_subname(&peers, "b"), vec!["2"]);
        assert_eq!(ids_by_subname(&peers, "o"), vec!["2"]);
        assert!(ids_by_subname(&peers, "x").is_empty());
    }

    #[test]
    fn test_ids_by_subname_matches_anywhere_case_insensitively() {
        let peers = vec![
            peer("1", "laptop-anna", true),
            peer("2", "Anna-phone", true),
            peer("3", "server", false),
        ];

        assert_eq!(ids_by_subname(&peers, "anna"), vec!["1", "2"]);
        assert_eq!(ids_by_subname(&peers, "ANNA"), vec!["1", "2"]);
    }

    #[test]
    fn test_check_success_flag() {
        assert!(check_success_flag(r#"{"success":true}"#).is_ok());
        assert!(matches!(
            check_success_flag(r#"{"success":false}"#),
            Err(ApiError::Rejected(_))
        ));
        // Missing flag counts as failure, not success.
        assert!(matches!(
            check_success_flag(r#"{}"#),
            Err(ApiError::Rejected(_))
        ));
        assert!(matches!(
            check_success_flag("not json"),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
