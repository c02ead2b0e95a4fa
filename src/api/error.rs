//! Forms API-specific error types.

/// Errors that can occur during forms API operations.
///
/// Failures are classified by kind so callers can distinguish transport
/// problems from server rejections and malformed payloads.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure with no usable response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server responded with a non-success status
    #[error("HTTP error (status {status}): {body}")]
    Http {
        status: u16,
        body: serde_json::Value,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response payload: {0}")]
    Validation(String),

    /// Request was aborted by the owning component's cancellation token
    #[error("Request cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Validation(e.to_string())
    }
}
