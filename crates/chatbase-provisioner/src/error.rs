use reqwest::StatusCode;
use thiserror::Error;

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

/// Why a single provisioning step did not succeed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Backend rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}
