use std::sync::Arc;

use api::store::ProgressStore;
use api::InMemoryApi;
use chrono::Duration;
use course_core::model::{
    Assignment, AssignmentId, Course, CourseId, Difficulty, Instructor, Lesson, LessonId,
    UserProfile,
};
use course_core::time::fixed_now;

use super::test_harness::{setup_view_harness, ViewKind};

fn sample_course() -> Course {
    Course {
        id: CourseId::new(7),
        title: "Rust basics".into(),
        description: "From zero to ownership".into(),
        difficulty: Difficulty::Beginner,
        instructor: Instructor {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
        },
        lessons: vec![Lesson {
            id: LessonId::new(1),
            title: "Ownership".into(),
            content: "Moves and borrows".into(),
            assignments: vec![Assignment {
                id: AssignmentId::new(11),
                title: "Fix the borrow".into(),
                description: "Make it compile".into(),
                test_cases: serde_json::Value::Null,
                solution_template: String::new(),
            }],
        }],
    }
}

fn learner() -> UserProfile {
    UserProfile {
        username: "grace".into(),
        email: "grace@example.com".into(),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        about: None,
        date_joined: Some(fixed_now() - Duration::days(5)),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn courses_view_smoke_renders_catalog() {
    let api = Arc::new(InMemoryApi::with_courses(vec![sample_course()]));
    let mut harness = setup_view_harness(ViewKind::Courses, api);

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Rust basics"), "missing course title in {html}");
    assert!(html.contains("Beginner"), "missing difficulty in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_hero() {
    let api = Arc::new(InMemoryApi::new());
    let mut harness = setup_view_harness(ViewKind::Home, api);

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Browse courses"), "missing hero action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_renders_progress() {
    let api = Arc::new(InMemoryApi::with_courses(vec![sample_course()]));
    let credential = api.seed_user(learner(), "pw");
    let mut harness = setup_view_harness(ViewKind::Profile, Arc::clone(&api));
    harness.session.set(credential.clone());

    // Seed one completed lesson through the store directly.
    let record = api
        .create_progress(&credential, CourseId::new(7))
        .await
        .unwrap();
    api.complete_lesson(&credential, record.id, LessonId::new(1))
        .await
        .unwrap();

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Grace Hopper"), "missing learner name in {html}");
    assert!(html.contains("1 of 1 lessons"), "missing progress label in {html}");
    assert!(html.contains("Course completed"), "missing badge in {html}");
}
