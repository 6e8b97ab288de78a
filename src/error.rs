/// Failures of a single call to the recommendation API.
///
/// Both kinds end up in the error banner; only the message differs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered, but with a failure status or a body we could not use.
    #[error("HTTP error: {0}")]
    Http(String),

    /// No structured response was obtained (connect failure, timeout, broken body).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn timeout() -> Self {
        ApiError::Transport("timeout".to_string())
    }

    /// The bare user-facing text, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Http(msg) | ApiError::Transport(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::timeout()
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Rejected title input. `missing[i]` is true when field `i` was empty.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Please enter three movie titles.")]
pub struct ValidationError {
    pub missing: [bool; 3],
}

pub type ApiResult<T> = Result<T, ApiError>;
