use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("upstream request failed: {0}")]
    UpstreamFailure(String),

    #[error("malformed response from inference endpoint: {0}")]
    MalformedResponse(String),

    #[error("no chat history to save")]
    EmptyHistory,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::UpstreamFailure(err.to_string())
    }
}
