use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Classified failures for API operations.
///
/// The transport adapter produces these from raw HTTP outcomes so that the
/// session layer and the presentation layer branch on a closed set instead
/// of inspecting response structure.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("unauthorized - session cookie missing or expired")]
    Unauthorized,

    #[error("request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server reported failure: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Shape of wg-easy error bodies; the field name varies by endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in messages
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Cut at a char boundary; a fixed byte offset can land inside a
        // multi-byte character.
        let cut = (0..=MAX_ERROR_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Pull a human-readable message out of an error response body,
    /// falling back to the truncated raw body or the status reason.
    fn server_message(status: StatusCode, body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message.or(parsed.error) {
                return message;
            }
        }
        if body.trim().is_empty() {
            return status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string();
        }
        Self::truncate_body(body)
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            400 | 402..=499 => ApiError::Client {
                status: status.as_u16(),
                message: Self::server_message(status, body),
            },
            500..=599 => ApiError::Server {
                status: status.as_u16(),
                message: Self::server_message(status, body),
            },
            _ => ApiError::InvalidResponse(format!(
                "unexpected status {}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }
}
