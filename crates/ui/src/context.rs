use std::sync::Arc;

use services::{AuthService, CatalogService, ProfileService, ProgressTracker, SessionContext};

/// What the composition root (desktop binary or test harness) provides to
/// the views.
pub trait UiApp: Send + Sync {
    fn session(&self) -> SessionContext;
    fn catalog(&self) -> Arc<CatalogService>;
    fn progress(&self) -> Arc<ProgressTracker>;
    fn auth(&self) -> Arc<AuthService>;
    fn profile(&self) -> Arc<ProfileService>;
}

#[derive(Clone)]
pub struct AppContext {
    session: SessionContext,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressTracker>,
    auth: Arc<AuthService>,
    profile: Arc<ProfileService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            catalog: app.catalog(),
            progress: app.progress(),
            auth: app.auth(),
            profile: app.profile(),
        }
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
