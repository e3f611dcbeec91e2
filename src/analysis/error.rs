//! Errors raised while analyzing an image.

/// Errors that can occur during an analysis call.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Please select an image first")]
    NoImageSelected,

    #[error("GROQ API key is not set. Current value: {value}")]
    MissingApiKey {
        /// The (empty or blank) value that was found, shown for diagnostics
        value: String,
    },

    #[error("HTTP error! status: {status}, body: {body}")]
    Http {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Raw response body
        body: String,
    },

    #[error("Unexpected response structure")]
    UnexpectedResponse,

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// True for failures detected before any I/O was attempted.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoImageSelected | AnalysisError::MissingApiKey { .. }
        )
    }
}
