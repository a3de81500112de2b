//! Client error taxonomy.
//!
//! NotFound is deliberately absent: looking up or cancelling an order that
//! does not exist is a normal outcome, modeled at the call sites.

use std::fmt;
use thiserror::Error;

/// Diagnostic payload for a non-success API response.
///
/// Carries the endpoint, the server's `message` field when one could be
/// parsed, the outbound request body and the raw response text. Rendering
/// all of it is part of the contract, not incidental logging.
#[derive(Debug)]
pub struct ApiError {
    pub endpoint: String,
    pub status: u16,
    pub server_message: Option<String>,
    pub request_body: Option<String>,
    pub raw_response: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Error getting data from API: {} (HTTP {})",
            self.endpoint, self.status
        )?;
        if let Some(message) = &self.server_message {
            writeln!(f, "Response: {message}")?;
        }
        writeln!(
            f,
            "Params: {}",
            self.request_body.as_deref().unwrap_or("None")
        )?;
        write!(f, "Raw: {}", self.raw_response)
    }
}

impl std::error::Error for ApiError {}

/// Errors surfaced by the client layer.
///
/// Nothing here is retried; every failure is returned to the caller to
/// decide presentation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured API secret is unusable (startup-fatal).
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The HTTP stack could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// The request never produced an HTTP response.
    #[error("Transport failure for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx, non-whitelisted-404 response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body did not match the expected shape.
    #[error("Malformed response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    /// A success response whose body contradicts the operation
    /// (e.g. a cancel acknowledged with a non-empty payload).
    #[error("Unexpected response from {endpoint}: {body}")]
    UnexpectedResponse { endpoint: String, body: String },
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
