//! Error types for the JSON HTTP client.
//!
//! # Design
//! One variant per stage of a call: encoding the body, building the request,
//! the network round-trip, the status check, and reading the body. Every
//! error is returned to the caller as-is; nothing is retried here.
//!
//! `Status` keeps the response body (best-effort, lossy UTF-8) so callers can
//! log what the server said, but its `Display` only shows the status line.

/// Boxed error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `HttpClient` and `Transport` implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request payload could not be serialized to JSON. Nothing was sent.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request could not be constructed (unknown method, malformed URL
    /// or header). Nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level failure: DNS, connect, TLS, reset.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with a status code >= 400.
    #[error("request failed with status: {status}{}", reason_suffix(.reason))]
    Status {
        status: u16,
        reason: Option<String>,
        body: String,
    },

    /// The response body could not be fully read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] std::io::Error),
}

impl ClientError {
    /// Wrap any transport failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        ClientError::Transport(err.into())
    }

    /// The HTTP status code, if the server answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(" {r}")).unwrap_or_default()
}
