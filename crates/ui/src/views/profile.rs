use dioxus::prelude::*;
use dioxus_router::{use_navigator, Link};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{view_state_from_resource, ViewState};
use crate::vm::{
    map_course_progress, map_profile_header, map_recent_assignments, stats_lines,
    CourseProgressVm, ProfileHeaderVm, RecentAssignmentVm,
};

#[derive(Clone, Debug, PartialEq)]
struct ProfileData {
    header: ProfileHeaderVm,
    stats: Vec<String>,
    courses: Vec<CourseProgressVm>,
    recent: Vec<RecentAssignmentVm>,
}

#[component]
pub fn ProfileView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let profile = ctx.profile();

    let resource = use_resource(move || {
        let profile = profile.clone();
        async move {
            let overview = profile.load().await?;
            Ok::<ProfileData, crate::views::ViewError>(ProfileData {
                header: map_profile_header(&overview.user),
                stats: stats_lines(&overview.stats),
                courses: map_course_progress(&overview.progress),
                recent: map_recent_assignments(&overview.progress),
            })
        }
    });

    // The original client bounced straight to the login page when the token
    // was rejected; keep that behavior.
    use_effect(move || {
        if let Some(Err(err)) = resource.value().read().as_ref() {
            if err.is_unauthenticated() {
                navigator.push(Route::Login {});
            }
        }
    });

    let state = view_state_from_resource(resource);
    let auth = ctx.auth();

    rsx! {
        div { class: "page profile-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                    if err.is_unauthenticated() {
                        Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
                    } else {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(data) => rsx! {
                    section { class: "profile-card",
                        h2 { class: "profile-name", "{data.header.name}" }
                        p { class: "profile-email", "{data.header.email}" }
                        if let Some(member_since) = data.header.member_since.as_ref() {
                            p { class: "profile-joined", "{member_since}" }
                        }
                        p { class: "profile-about", "{data.header.about}" }
                        div { class: "profile-stats",
                            h3 { "Statistics" }
                            for line in data.stats.iter() {
                                p { class: "stat-line", "{line}" }
                            }
                        }
                        button {
                            class: "btn btn-danger",
                            r#type: "button",
                            onclick: move |_| {
                                auth.logout();
                                navigator.push(Route::Login {});
                            },
                            "Sign out"
                        }
                    }
                    section { class: "profile-progress",
                        h3 { "My progress" }
                        if data.courses.is_empty() {
                            div { class: "profile-empty",
                                p { "You have not started any course yet." }
                                Link { class: "btn btn-primary", to: Route::Courses {}, "Start learning" }
                            }
                        }
                        for course in data.courses.iter() {
                            div { class: "progress-card", key: "{course.course_id}",
                                h4 { "{course.title}" }
                                p { class: "progress-label", "{course.progress_label}" }
                                div { class: "progress-bar",
                                    div {
                                        class: "progress-bar-fill",
                                        style: "width: {course.percent}%",
                                    }
                                }
                                if course.completed {
                                    span { class: "progress-badge", "Course completed" }
                                }
                                Link {
                                    class: "btn btn-secondary",
                                    to: Route::CourseDetail { course_id: course.course_id },
                                    "Open course"
                                }
                            }
                        }
                        h3 { "Recently solved assignments" }
                        if data.recent.is_empty() {
                            p { "No solved assignments yet." }
                        }
                        for assignment in data.recent.iter() {
                            div { class: "recent-assignment", key: "{assignment.assignment_id}",
                                span { class: "assignment-title", "{assignment.title}" }
                                span { class: "assignment-course", "Course: {assignment.course_title}" }
                                Link {
                                    class: "btn btn-secondary",
                                    to: Route::AssignmentDetail {
                                        course_id: assignment.course_id,
                                        lesson_id: assignment.lesson_id,
                                        assignment_id: assignment.assignment_id,
                                    },
                                    "Open"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
