use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{view_state_from_resource, ViewState};
use crate::vm::{map_course_cards, parse_difficulty_filter, CourseCardVm};

#[component]
pub fn CoursesView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let mut filter = use_signal(String::new);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let courses = catalog.list_courses().await?;
            Ok::<_, crate::views::ViewError>(map_course_cards(&courses))
        }
    });

    let state = view_state_from_resource(resource);
    let wanted = parse_difficulty_filter(&filter());

    rsx! {
        div { class: "page courses-page",
            header { class: "view-header",
                h2 { class: "view-title", "Available courses" }
                select {
                    class: "difficulty-filter",
                    value: "{filter()}",
                    onchange: move |evt| filter.set(evt.value()),
                    option { value: "all", "All levels" }
                    option { value: "beginner", "Beginner" }
                    option { value: "intermediate", "Intermediate" }
                    option { value: "advanced", "Advanced" }
                }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(cards) => {
                    let visible = cards
                        .iter()
                        .filter(|card| card.matches_filter(wanted))
                        .cloned()
                        .collect::<Vec<CourseCardVm>>();
                    rsx! {
                        if visible.is_empty() {
                            p { class: "courses-empty", "No courses available for that level." }
                        } else {
                            div { class: "course-grid",
                                for card in visible {
                                    div { class: "course-card", key: "{card.id}",
                                        span { class: "course-difficulty", "{card.difficulty_label}" }
                                        h3 { class: "course-title", "{card.title}" }
                                        p { class: "course-description", "{card.description}" }
                                        Link {
                                            class: "btn btn-primary",
                                            to: Route::CourseDetail { course_id: card.id },
                                            "View course"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
