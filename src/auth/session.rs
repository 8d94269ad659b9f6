//! Session lifecycle for the wg-easy API.
//!
//! wg-easy grants access through a `connect.sid` session cookie issued by the
//! login exchange. The [`SessionManager`] owns that cookie exclusively:
//! it performs the login, attaches the cookie to guarded operations, and
//! re-authenticates exactly once when the server signals expiry with a 401.
//! A guarded call therefore performs at most two authentication attempts and
//! at most two operation attempts.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{self, HeaderMap};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::transport::Transport;
use crate::api::ApiError;

/// Name of the session cookie issued by the login exchange.
const SESSION_COOKIE_NAME: &str = "connect.sid";

/// Login endpoint path.
const SESSION_PATH: &str = "/api/session";

/// Logical success flag carried in the login response body.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    success: bool,
}

/// Owns the mutable session cookie and wraps operations with
/// at-most-one-retry-on-expiry semantics.
pub struct SessionManager<T: Transport> {
    transport: Arc<T>,
    password: String,
    /// Exclusive cookie storage. The lock is held across the login exchange
    /// so concurrent expiry signals collapse into a single re-authentication.
    cookie: Mutex<Option<String>>,
}

impl<T: Transport> SessionManager<T> {
    pub fn new(transport: Arc<T>, password: String) -> Self {
        Self {
            transport,
            password,
            cookie: Mutex::new(None),
        }
    }

    /// Current session cookie, if one has been established.
    async fn cookie(&self) -> Option<String> {
        self.cookie.lock().await.clone()
    }

    /// Perform the login exchange and store the issued cookie.
    ///
    /// On failure the previously stored cookie is left untouched; a stale
    /// but possibly valid session is never discarded speculatively.
    pub async fn authenticate(&self) -> Result<(), ApiError> {
        self.login(None).await
    }

    /// Establish a session only if none is held. Intended for startup
    /// warm-up so callers can fail fast on a bad password.
    pub async fn ensure_session(&self) -> Result<(), ApiError> {
        if self.cookie().await.is_none() {
            self.authenticate().await?;
        }
        Ok(())
    }

    /// Login exchange. When `stale` is given, the exchange is skipped if the
    /// stored cookie no longer matches it: some concurrent call already
    /// refreshed the session, so N expiry signals produce one login.
    async fn login(&self, stale: Option<&str>) -> Result<(), ApiError> {
        let mut held = self.cookie.lock().await;
        if let Some(stale) = stale {
            if held.as_deref() != Some(stale) {
                debug!("session already refreshed by a concurrent call");
                return Ok(());
            }
        }

        let body = json!({ "password": self.password, "remember": true });
        let response = self
            .transport
            .send(Method::POST, SESSION_PATH, Some(&body), None)
            .await
            .map_err(|e| ApiError::Authentication(format!("login request failed: {e}")))?;

        debug!(status = %response.status, "login exchange completed");
        let parsed: SessionResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Authentication(format!("unreadable login response: {e}")))?;
        if !parsed.success {
            return Err(ApiError::Authentication(
                "server rejected the password".to_string(),
            ));
        }

        // The server reporting success without issuing a cookie is an
        // inconsistency we refuse to paper over.
        let cookie = extract_session_cookie(&response.headers).ok_or_else(|| {
            ApiError::Authentication(format!(
                "login succeeded but no {SESSION_COOKIE_NAME} cookie was issued"
            ))
        })?;

        *held = Some(cookie);
        debug!("session established");
        Ok(())
    }

    /// Run `op` with a valid session, re-authenticating at most once.
    ///
    /// 1. No cookie held: authenticate first; a failure here propagates
    ///    immediately and `op` is never attempted.
    /// 2. Run `op` with the stored cookie.
    /// 3. On [`ApiError::Unauthorized`]: re-authenticate once, then run `op`
    ///    exactly one more time and return that outcome unretried. If the
    ///    re-authentication fails, its error propagates, not the 401.
    /// 4. Any other error propagates unchanged.
    pub async fn run_guarded<R, F, Fut>(&self, op: F) -> Result<R, ApiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let cookie = match self.cookie().await {
            Some(cookie) => cookie,
            None => {
                self.authenticate().await?;
                self.cookie().await.ok_or_else(|| {
                    ApiError::Authentication("no session cookie after login".to_string())
                })?
            }
        };

        match op(cookie.clone()).await {
            Err(ApiError::Unauthorized) => {
                warn!("session expired, re-authenticating");
                self.login(Some(&cookie)).await.map_err(|e| match e {
                    ApiError::Authentication(msg) => ApiError::Authentication(format!(
                        "re-authentication after session expiry failed: {msg}"
                    )),
                    other => other,
                })?;
                let fresh = self.cookie().await.ok_or_else(|| {
                    ApiError::Authentication("no session cookie after re-login".to_string())
                })?;
                op(fresh).await
            }
            outcome => outcome,
        }
    }
}

/// Extract the session cookie from login response headers, stripping
/// attributes such as `Path` and `HttpOnly`. Returns `connect.sid=<value>`,
/// ready to be sent back in a `Cookie` header.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE_NAME}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
}
