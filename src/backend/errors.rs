use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Resource not found")]
    NotFound,

    #[error("Not authorized by the backend")]
    Unauthorized,

    #[error("Backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected payload: {0}")]
    Decode(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("{path} still had a next page after {pages} pages")]
    TooManyPages { path: String, pages: usize },
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Maps a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            404 => BackendError::NotFound,
            401 | 403 => BackendError::Unauthorized,
            _ => BackendError::Status {
                status,
                body: body.into(),
            },
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for BackendError {
    fn from(err: url::ParseError) -> Self {
        BackendError::InvalidUrl(err.to_string())
    }
}
