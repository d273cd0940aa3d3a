use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let signed_in = ctx.session().is_authenticated();

    rsx! {
        div { class: "page home-page",
            header { class: "hero",
                h1 { "Learn to code, one lesson at a time" }
                p { class: "hero-subtitle",
                    "Pick a course, work through the lessons, and solve the practice assignments."
                }
                div { class: "hero-actions",
                    Link { class: "btn btn-primary", to: Route::Courses {}, "Browse courses" }
                    if !signed_in {
                        Link { class: "btn btn-secondary", to: Route::Register {}, "Create an account" }
                    }
                }
            }
        }
    }
}
