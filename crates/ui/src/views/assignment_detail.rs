use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link};

use course_core::model::{Assignment, AssignmentId, CourseId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{view_state_from_resource, ViewState};

#[component]
pub fn AssignmentDetailView(course_id: u64, lesson_id: u64, assignment_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();
    let progress = ctx.progress();
    let mut submitting = use_signal(|| false);
    let mut status = use_signal(|| None::<String>);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let assignment = catalog.get_assignment(AssignmentId::new(assignment_id)).await?;
            Ok::<Assignment, crate::views::ViewError>(assignment)
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page assignment-detail-page",
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
                ViewState::Ready(assignment) => {
                    let test_cases = serde_json::to_string_pretty(&assignment.test_cases)
                        .unwrap_or_else(|_| "[]".to_string());
                    rsx! {
                        header { class: "view-header",
                            h2 { class: "view-title", "{assignment.title}" }
                        }
                        p { class: "assignment-description", "{assignment.description}" }
                        section { class: "assignment-block",
                            h3 { "Test cases" }
                            pre { class: "code-block", "{test_cases}" }
                        }
                        section { class: "assignment-block",
                            h3 { "Solution template" }
                            pre { class: "code-block", "{assignment.solution_template}" }
                        }
                        footer { class: "assignment-actions",
                            Link {
                                class: "btn btn-secondary",
                                to: Route::LessonDetail { course_id, lesson_id },
                                "Back to lesson"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                disabled: submitting(),
                                onclick: move |_| {
                                    let progress = progress.clone();
                                    let navigator = navigator;
                                    spawn(async move {
                                        submitting.set(true);
                                        let result = progress
                                            .complete_assignment(
                                                CourseId::new(course_id),
                                                AssignmentId::new(assignment_id),
                                            )
                                            .await;
                                        submitting.set(false);
                                        match result {
                                            Ok(_) => status.set(Some("Assignment marked as solved.".to_string())),
                                            Err(err) if err.is_unauthenticated() => {
                                                navigator.push(Route::Login {});
                                            }
                                            Err(_) => status.set(Some(
                                                "Could not record the assignment. Please try again.".to_string(),
                                            )),
                                        }
                                    });
                                },
                                "Mark as solved"
                            }
                        }
                        if let Some(message) = status() {
                            p { class: "status-line", "{message}" }
                        }
                    }
                },
            }
        }
    }
}
