use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::{Course, CourseId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{view_state_from_resource, ViewState};

#[component]
pub fn CourseDetailView(course_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let course = catalog.get_course(CourseId::new(course_id)).await?;
            Ok::<Course, crate::views::ViewError>(course)
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page course-detail-page",
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
                ViewState::Ready(course) => {
                    let instructor = course.instructor.full_name();
                    rsx! {
                        header { class: "view-header",
                            h2 { class: "view-title", "{course.title}" }
                            if !instructor.is_empty() {
                                p { class: "view-subtitle", "Instructor: {instructor}" }
                            }
                            p { class: "course-description", "{course.description}" }
                        }
                        section { class: "lesson-list",
                            h3 { "Course content" }
                            for (index, lesson) in course.lessons.iter().enumerate() {
                                div { class: "lesson-row", key: "{lesson.id}",
                                    div { class: "lesson-row-text",
                                        h4 { "{lesson.title}" }
                                        p { class: "lesson-number", "Lesson {index + 1}" }
                                    }
                                    Link {
                                        class: "btn btn-secondary",
                                        to: Route::LessonDetail {
                                            course_id,
                                            lesson_id: lesson.id.value(),
                                        },
                                        "Start lesson"
                                    }
                                }
                                for assignment in lesson.assignments.iter() {
                                    div { class: "assignment-row", key: "{assignment.id}",
                                        span { class: "assignment-title", "{assignment.title}" }
                                        span { class: "assignment-kind", "Practice assignment" }
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
