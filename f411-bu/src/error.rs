//! Error taxonomy for the bulk-upload client
//!
//! Every remote failure is classified into one of these variants so the
//! caller can show a single human-readable notification. Nothing at this
//! layer retries automatically; recovery is user-initiated.

use f411_common::api::ErrorEnvelope;
use thiserror::Error;

/// Result type for bulk-upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Classified failure of one bulk-upload operation
#[derive(Debug, Error)]
pub enum UploadError {
    /// Request exceeded the HTTP client's deadline
    #[error("Request timed out")]
    Timeout,

    /// Could not reach the backend at all
    #[error("Network unreachable")]
    Offline,

    /// 429 from the backend
    #[error("Rate limit exceeded")]
    RateLimit,

    /// 401 (token refresh is handled outside this workflow)
    #[error("Not authorized")]
    Unauthorized,

    /// 403
    #[error("Forbidden")]
    Forbidden,

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400/422 - the server's message is surfaced verbatim
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Other 5xx
    #[error("Server error {0}: {1}")]
    Server(u16, String),

    /// Response arrived for a session the user already abandoned
    #[error("Stale response discarded")]
    Stale,

    /// Local file I/O failure during intake
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration problem (missing token, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything unclassified
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl UploadError {
    /// Classify a reqwest transport failure
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UploadError::Timeout
        } else if err.is_connect() {
            UploadError::Offline
        } else {
            UploadError::Unknown(err.to_string())
        }
    }

    /// Classify a non-2xx response by status code, extracting the server's
    /// message from the error envelope when one is present.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|env| env.error.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });

        match status.as_u16() {
            400 | 422 => UploadError::Validation(message),
            401 => UploadError::Unauthorized,
            403 => UploadError::Forbidden,
            404 => UploadError::NotFound(message),
            429 => UploadError::RateLimit,
            code if status.is_server_error() => UploadError::Server(code, message),
            _ => UploadError::Unknown(format!("{}: {}", status, message)),
        }
    }

    /// Toast-style message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Timeout => "The request timed out. Please try again.".to_string(),
            UploadError::Offline => {
                "Could not reach Flying411. Check your connection and try again.".to_string()
            }
            UploadError::RateLimit => "Too many requests. Wait a moment and retry.".to_string(),
            UploadError::Unauthorized => "Your session has expired. Sign in again.".to_string(),
            UploadError::Forbidden => "You don't have access to this upload.".to_string(),
            UploadError::NotFound(what) => format!("Not found: {}", what),
            UploadError::Validation(msg) => msg.clone(),
            UploadError::Server(code, _) => {
                format!("Flying411 had a problem ({}). Please try again.", code)
            }
            UploadError::Stale => "Discarded a response for an abandoned upload.".to_string(),
            UploadError::Io(err) => format!("Could not read the file: {}", err),
            UploadError::Config(msg) => msg.clone(),
            UploadError::Unknown(msg) => format!("Something went wrong: {}", msg),
        }
    }

    /// True when a plain retry of the same action may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UploadError::Timeout
                | UploadError::Offline
                | UploadError::RateLimit
                | UploadError::Server(_, _)
        )
    }
}
