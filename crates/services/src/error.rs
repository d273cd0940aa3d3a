//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;

/// Errors emitted by `ProgressTracker`.
///
/// The three kinds callers act on: force re-authentication, show a
/// user-visible message, or offer a retry. Retrying is always safe; the
/// tracker's operations are idempotent.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("course, lesson, or assignment not recognized")]
    NotFound,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for ProgressError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthenticated => ProgressError::Unauthenticated,
            ApiError::NotFound => ProgressError::NotFound,
            other => ProgressError::Api(other),
        }
    }
}

impl ProgressError {
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ProgressError::Unauthenticated)
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for CatalogError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => CatalogError::NotFound,
            other => CatalogError::Api(other),
        }
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid username or password")]
    BadCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthenticated => AuthError::Unauthenticated,
            ApiError::Rejected(message) => AuthError::Rejected(message),
            other => AuthError::Api(other),
        }
    }
}

impl AuthError {
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AuthError::Unauthenticated)
    }
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

impl ProfileError {
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            ProfileError::Auth(err) => err.is_unauthenticated(),
            ProfileError::Progress(err) => err.is_unauthenticated(),
        }
    }
}
