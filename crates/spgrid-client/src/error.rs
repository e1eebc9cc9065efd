use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures of a single procedure call
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Response is not JSON (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Request(error.to_string())
    }
}
