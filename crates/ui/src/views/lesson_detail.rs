use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link};

use course_core::model::{CourseId, Lesson, LessonId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{view_state_from_resource, ViewState};

#[component]
pub fn LessonDetailView(course_id: u64, lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();
    let progress = ctx.progress();
    let mut completing = use_signal(|| false);
    let mut status = use_signal(|| None::<String>);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let lesson = catalog.get_lesson(LessonId::new(lesson_id)).await?;
            Ok::<Lesson, crate::views::ViewError>(lesson)
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page lesson-detail-page",
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
                ViewState::Ready(lesson) => rsx! {
                    header { class: "view-header",
                        h2 { class: "view-title", "{lesson.title}" }
                    }
                    section { class: "lesson-content",
                        p { "{lesson.content}" }
                    }
                    section { class: "lesson-assignments",
                        h3 { "Practice assignments" }
                        if lesson.assignments.is_empty() {
                            p { "This lesson has no assignments." }
                        }
                        for assignment in lesson.assignments.iter() {
                            div { class: "assignment-row", key: "{assignment.id}",
                                div { class: "assignment-text",
                                    h4 { "{assignment.title}" }
                                    p { "{assignment.description}" }
                                }
                                Link {
                                    class: "btn btn-secondary",
                                    to: Route::AssignmentDetail {
                                        course_id,
                                        lesson_id,
                                        assignment_id: assignment.id.value(),
                                    },
                                    "Solve"
                                }
                            }
                        }
                    }
                    footer { class: "lesson-actions",
                        Link {
                            class: "btn btn-secondary",
                            to: Route::CourseDetail { course_id },
                            "Back to course"
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: completing(),
                            onclick: move |_| {
                                let progress = progress.clone();
                                let navigator = navigator;
                                spawn(async move {
                                    completing.set(true);
                                    let result = progress
                                        .complete_lesson(CourseId::new(course_id), LessonId::new(lesson_id))
                                        .await;
                                    completing.set(false);
                                    match result {
                                        Ok(_) => status.set(Some("Lesson marked as completed.".to_string())),
                                        Err(err) if err.is_unauthenticated() => {
                                            navigator.push(Route::Login {});
                                        }
                                        Err(_) => status.set(Some(
                                            "Could not record the lesson. Please try again.".to_string(),
                                        )),
                                    }
                                });
                            },
                            "Mark as completed"
                        }
                    }
                    if let Some(message) = status() {
                        p { class: "status-line", "{message}" }
                    }
                },
            }
        }
    }
}
