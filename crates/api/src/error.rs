use thiserror::Error;

/// Errors surfaced by the remote data API.
///
/// `Unauthenticated` and `NotFound` carry meaning for callers (force
/// re-authentication, show a user-visible message); everything else is a
/// transport-class failure the caller may retry at its own discretion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
