//! Error types for the paywhirl library.

use thiserror::Error;

/// Result type alias for paywhirl operations.
pub type Result<T> = std::result::Result<T, PaywhirlError>;

#[derive(Error, Debug)]
pub enum PaywhirlError {
    #[error("API key must not be empty. Keys are available at https://app.paywhirl.com/api-keys.")]
    MissingApiKey,

    #[error("API secret must not be empty. Keys are available at https://app.paywhirl.com/api-keys.")]
    MissingApiSecret,

    #[error("HTTP method '{0}' is not supported. Use GET, POST, PUT or DELETE.")]
    UnsupportedHttpMethod(String),

    /// The server answered with a status outside the 200-299 range.
    ///
    /// The status code and raw body are carried as-is; this library does
    /// not interpret individual status codes.
    #[error("HTTP {status}: {body}")]
    Http { status: u32, body: String },

    /// The server answered with a success status but the body was not
    /// valid JSON. The raw body is kept for inspection.
    #[error("response body is not valid JSON: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },

    #[error("failed to serialize request parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network request failed: {0}")]
    Transport(#[from] curl::Error),

    #[error("server returned invalid text encoding: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl PaywhirlError {
    /// The HTTP status code, for `Http` errors.
    pub fn status(&self) -> Option<u32> {
        match self {
            PaywhirlError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, for `Http` and `Decode` errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            PaywhirlError::Http { body, .. } | PaywhirlError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}
