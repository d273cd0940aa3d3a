use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{
    AssignmentDetailView, CourseDetailView, CoursesView, HomeView, LessonDetailView, LoginView,
    ProfileView, RegisterView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/courses", CoursesView)] Courses {},
        #[route("/courses/:course_id", CourseDetailView)] CourseDetail { course_id: u64 },
        #[route("/courses/:course_id/lessons/:lesson_id", LessonDetailView)] LessonDetail { course_id: u64, lesson_id: u64 },
        #[route("/courses/:course_id/lessons/:lesson_id/assignments/:assignment_id", AssignmentDetailView)] AssignmentDetail { course_id: u64, lesson_id: u64, assignment_id: u64 },
        #[route("/profile", ProfileView)] Profile {},
        #[route("/login", LoginView)] Login {},
        #[route("/register", RegisterView)] Register {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let signed_in = ctx.session().is_authenticated();

    rsx! {
        nav { class: "navbar",
            Link { class: "brand", to: Route::Home {}, "Campus" }
            div { class: "nav-links",
                Link { to: Route::Courses {}, "Courses" }
                if signed_in {
                    Link { to: Route::Profile {}, "Profile" }
                    button {
                        class: "nav-button",
                        r#type: "button",
                        onclick: move |_| {
                            ctx.auth().logout();
                            navigator.push(Route::Login {});
                        },
                        "Sign out"
                    }
                } else {
                    Link { to: Route::Login {}, "Sign in" }
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
