use dioxus::prelude::*;

use services::{AuthError, CatalogError, ProfileError, ProgressError};

/// What a view can tell the user when loading or mutating fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unauthenticated,
    NotFound,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ViewError::Unauthenticated => "Please sign in to continue.",
            ViewError::NotFound => "That content could not be found.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }

    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ViewError::Unauthenticated)
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => ViewError::NotFound,
            CatalogError::Api(_) => ViewError::Unknown,
            _ => ViewError::Unknown,
        }
    }
}

impl From<ProgressError> for ViewError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::Unauthenticated => ViewError::Unauthenticated,
            ProgressError::NotFound => ViewError::NotFound,
            ProgressError::Api(_) => ViewError::Unknown,
            _ => ViewError::Unknown,
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthenticated() {
            ViewError::Unauthenticated
        } else {
            ViewError::Unknown
        }
    }
}

impl From<ProfileError> for ViewError {
    fn from(err: ProfileError) -> Self {
        if err.is_unauthenticated() {
            ViewError::Unauthenticated
        } else {
            ViewError::Unknown
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
