use std::sync::Arc;

use tracing::debug;

use api::store::{AuthApi, RegisterRequest};
use api::ApiError;
use course_core::model::UserProfile;

use crate::error::AuthError;
use crate::progress::ProgressTracker;
use crate::session::SessionContext;

/// Account workflows: sign in, sign up, sign out, current-user lookup.
///
/// Owns the transitions of the session context. Whenever the signed-in
/// learner changes, the progress tracker's identifier cache is reset; the
/// cache maps the previous learner's records.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: SessionContext,
    tracker: Arc<ProgressTracker>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: SessionContext,
        tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            api,
            session,
            tracker,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Exchange username/password for a credential and store it in the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::BadCredentials` when the server rejects the pair,
    /// transport errors otherwise.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let credential = self
            .api
            .login(username, password)
            .await
            .map_err(|err| match err {
                ApiError::Unauthenticated | ApiError::Rejected(_) => AuthError::BadCredentials,
                other => AuthError::from(other),
            })?;
        self.tracker.reset();
        self.session.set(credential);
        debug!(username, "signed in");
        Ok(())
    }

    /// Create an account, then sign in with the fresh credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the server's validation message,
    /// or any error from the follow-up login.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        self.api.register(request).await?;
        self.login(&request.username, &request.password).await
    }

    /// Discard the credential and cached progress identifiers.
    pub fn logout(&self) {
        self.session.clear();
        self.tracker.reset();
        debug!("signed out");
    }

    /// Fetch the signed-in learner's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` (and discards the credential)
    /// when the session holds none or the server rejects it.
    pub async fn current_user(&self) -> Result<UserProfile, AuthError> {
        let credential = self
            .session
            .credential()
            .ok_or(AuthError::Unauthenticated)?;
        match self.api.current_user(&credential).await {
            Ok(user) => Ok(user),
            Err(ApiError::Unauthenticated) => {
                self.session.clear();
                Err(AuthError::Unauthenticated)
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use course_core::model::Credential;

    fn service() -> (Arc<InMemoryApi>, SessionContext, AuthService) {
        let api = Arc::new(InMemoryApi::new());
        let session = SessionContext::new();
        let store: Arc<dyn api::ProgressStore> = api.clone();
        let auth_api: Arc<dyn api::AuthApi> = api.clone();
        let tracker = Arc::new(ProgressTracker::new(
            session.clone(),
            store,
        ));
        let auth = AuthService::new(
            auth_api,
            session.clone(),
            tracker,
        );
        (api, session, auth)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "grace".into(),
            email: "grace@example.com".into(),
            password: "pw".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
        }
    }

    #[tokio::test]
    async fn register_signs_in_automatically() {
        let (_api, session, auth) = service();
        auth.register(&register_request()).await.unwrap();
        assert!(session.is_authenticated());

        let user = auth.current_user().await.unwrap();
        assert_eq!(user.username, "grace");
    }

    #[tokio::test]
    async fn bad_password_maps_to_bad_credentials() {
        let (_api, session, auth) = service();
        auth.register(&register_request()).await.unwrap();
        auth.logout();

        let err = auth.login("grace", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn duplicate_username_carries_the_server_message() {
        let (_api, _session, auth) = service();
        auth.register(&register_request()).await.unwrap();

        let err = auth.register(&register_request()).await.unwrap_err();
        match err {
            AuthError::Rejected(message) => assert_eq!(message, "username already taken"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_token_clears_the_session() {
        let (_api, session, auth) = service();
        session.set(Credential::new("stale"));

        let err = auth.current_user().await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_discards_the_credential() {
        let (_api, session, auth) = service();
        auth.register(&register_request()).await.unwrap();
        auth.logout();
        assert!(!session.is_authenticated());
        assert!(matches!(
            auth.current_user().await,
            Err(AuthError::Unauthenticated)
        ));
    }
}
