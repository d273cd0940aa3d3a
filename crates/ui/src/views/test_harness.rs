use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use api::InMemoryApi;
use course_core::time::fixed_clock;
use services::{
    AuthService, CatalogService, ProfileService, ProgressTracker, SessionContext,
};

use crate::context::{build_app_context, UiApp};
use crate::views::{CoursesView, HomeView, ProfileView};

#[derive(Clone)]
struct TestApp {
    session: SessionContext,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressTracker>,
    auth: Arc<AuthService>,
    profile: Arc<ProfileService>,
}

impl UiApp for TestApp {
    fn session(&self) -> SessionContext {
        self.session.clone()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Courses,
    Profile,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Courses => rsx! { CoursesView {} },
        ViewKind::Profile => rsx! { ProfileView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<InMemoryApi>,
    pub session: SessionContext,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, api: Arc<InMemoryApi>) -> ViewHarness {
    let session = SessionContext::new();
    let store: Arc<dyn api::ProgressStore> = api.clone();
    let auth_api: Arc<dyn api::AuthApi> = api.clone();
    let catalog_api: Arc<dyn api::CatalogReader> = api.clone();
    let tracker = Arc::new(ProgressTracker::new(
        session.clone(),
        store,
    ));
    let auth = Arc::new(AuthService::new(
        auth_api,
        session.clone(),
        Arc::clone(&tracker),
    ));
    let catalog = Arc::new(CatalogService::new(
        catalog_api,
    ));
    let profile = Arc::new(ProfileService::new(
        fixed_clock(),
        Arc::clone(&auth),
        Arc::clone(&tracker),
    ));

    let app = Arc::new(TestApp {
        session: session.clone(),
        catalog,
        progress: tracker,
        auth,
        profile,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, api, session }
}
