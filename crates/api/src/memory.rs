use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use course_core::model::{
    Assignment, AssignmentId, Course, CourseId, CourseSummary, Credential, Lesson, LessonId,
    ProgressId, UserProfile,
};

use crate::error::ApiError;
use crate::store::{
    AuthApi, CatalogReader, CompletedAssignmentBrief, CourseBrief, LessonBrief, ProgressRecord,
    ProgressStore, RegisterRequest,
};

//
// ─── IN-MEMORY API ─────────────────────────────────────────────────────────────
//

struct UserRow {
    profile: UserProfile,
    password: String,
}

struct ProgressRow {
    id: ProgressId,
    username: String,
    course_id: CourseId,
    // Appended blindly, like a store that does not deduplicate; clients are
    // expected to treat the collections as sets.
    lessons: Vec<LessonId>,
    assignments: Vec<AssignmentId>,
}

#[derive(Default)]
struct State {
    courses: Vec<Course>,
    users: HashMap<String, UserRow>,
    tokens: HashMap<String, String>,
    progress: Vec<ProgressRow>,
    fail_next_create: Option<ApiError>,
    fail_next_completion: Option<ApiError>,
}

/// Simple in-memory implementation of the whole data API for testing and
/// prototyping.
///
/// Besides the three contracts it exposes test instrumentation: a creation
/// counter, a one-shot injected write failure, and token revocation.
#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
    next_progress_id: AtomicU64,
    next_token: AtomicU64,
    create_calls: AtomicU64,
    list_calls: AtomicU64,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_courses(courses: Vec<Course>) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().expect("state lock");
            state.courses = courses;
        }
        api
    }

    pub fn seed_course(&self, course: Course) {
        self.state.lock().expect("state lock").courses.push(course);
    }

    /// Registers a user directly and returns an issued credential.
    pub fn seed_user(&self, profile: UserProfile, password: &str) -> Credential {
        let username = profile.username.clone();
        let mut state = self.state.lock().expect("state lock");
        state.users.insert(
            username.clone(),
            UserRow {
                profile,
                password: password.to_string(),
            },
        );
        drop(state);
        self.issue_token(&username)
    }

    fn issue_token(&self, username: &str) -> Credential {
        let token = format!("token-{}", self.next_token.fetch_add(1, Ordering::SeqCst) + 1);
        self.state
            .lock()
            .expect("state lock")
            .tokens
            .insert(token.clone(), username.to_string());
        Credential::new(token)
    }

    /// Invalidates a credential server-side; subsequent calls with it
    /// answer `Unauthenticated`.
    pub fn revoke(&self, credential: &Credential) {
        self.state
            .lock()
            .expect("state lock")
            .tokens
            .remove(credential.expose());
    }

    /// Number of creation requests that reached the store.
    #[must_use]
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of progress listings served.
    #[must_use]
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Makes the next creation request fail with `err`.
    pub fn fail_next_create(&self, err: ApiError) {
        self.state.lock().expect("state lock").fail_next_create = Some(err);
    }

    /// Makes the next completion request fail with `err`, leaving creation
    /// untouched.
    pub fn fail_next_completion(&self, err: ApiError) {
        self.state.lock().expect("state lock").fail_next_completion = Some(err);
    }

    /// Raw completed-lesson entries of a record, duplicates included.
    #[must_use]
    pub fn raw_lessons(&self, progress: ProgressId) -> Vec<LessonId> {
        let state = self.state.lock().expect("state lock");
        state
            .progress
            .iter()
            .find(|row| row.id == progress)
            .map(|row| row.lessons.clone())
            .unwrap_or_default()
    }

    /// Number of progress records currently stored.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.state.lock().expect("state lock").progress.len()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|err| ApiError::Transport(err.to_string()))
    }
}

fn authorize(state: &State, credential: &Credential) -> Result<String, ApiError> {
    state
        .tokens
        .get(credential.expose())
        .cloned()
        .ok_or(ApiError::Unauthenticated)
}

fn take_injected(slot: &mut Option<ApiError>) -> Result<(), ApiError> {
    match slot.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn find_assignment(courses: &[Course], id: AssignmentId) -> Option<(&Lesson, &Assignment)> {
    courses.iter().flat_map(|course| &course.lessons).find_map(|lesson| {
        lesson
            .assignments
            .iter()
            .find(|assignment| assignment.id == id)
            .map(|assignment| (lesson, assignment))
    })
}

fn record_from_row(state: &State, row: &ProgressRow) -> ProgressRecord {
    let course = state
        .courses
        .iter()
        .find(|course| course.id == row.course_id);
    let course_brief = CourseBrief {
        id: row.course_id,
        title: course.map(|c| c.title.clone()).unwrap_or_default(),
        lessons: course
            .map(|c| {
                c.lessons
                    .iter()
                    .map(|lesson| LessonBrief {
                        id: lesson.id,
                        title: lesson.title.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    };
    let completed_lessons = row
        .lessons
        .iter()
        .map(|id| LessonBrief {
            id: *id,
            title: String::new(),
        })
        .collect();
    let completed_assignments = row
        .assignments
        .iter()
        .map(|id| {
            let found = find_assignment(&state.courses, *id);
            CompletedAssignmentBrief {
                id: *id,
                lesson: found.map_or(LessonId::new(0), |(lesson, _)| lesson.id),
                title: found.map_or_else(String::new, |(_, assignment)| assignment.title.clone()),
            }
        })
        .collect();
    ProgressRecord {
        id: row.id,
        course: course_brief,
        completed_lessons,
        completed_assignments,
    }
}

//
// ─── TRAIT IMPLS ───────────────────────────────────────────────────────────────
//

#[async_trait]
impl CatalogReader for InMemoryApi {
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ApiError> {
        let state = self.locked()?;
        Ok(state
            .courses
            .iter()
            .map(|course| CourseSummary {
                id: course.id,
                title: course.title.clone(),
                description: course.description.clone(),
                difficulty: course.difficulty,
            })
            .collect())
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let state = self.locked()?;
        state
            .courses
            .iter()
            .find(|course| course.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        let state = self.locked()?;
        state
            .courses
            .iter()
            .flat_map(|course| &course.lessons)
            .find(|lesson| lesson.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, ApiError> {
        let state = self.locked()?;
        find_assignment(&state.courses, id)
            .map(|(_, assignment)| assignment.clone())
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl ProgressStore for InMemoryApi {
    async fn list_progress(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ProgressRecord>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.locked()?;
        let username = authorize(&state, credential)?;
        Ok(state
            .progress
            .iter()
            .filter(|row| row.username == username)
            .map(|row| record_from_row(&state, row))
            .collect())
    }

    async fn create_progress(
        &self,
        credential: &Credential,
        course: CourseId,
    ) -> Result<ProgressRecord, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.locked()?;
        let username = authorize(&state, credential)?;
        take_injected(&mut state.fail_next_create)?;
        if !state.courses.iter().any(|c| c.id == course) {
            return Err(ApiError::NotFound);
        }
        let id = ProgressId::new(self.next_progress_id.fetch_add(1, Ordering::SeqCst) + 1);
        let row = ProgressRow {
            id,
            username,
            course_id: course,
            lessons: Vec::new(),
            assignments: Vec::new(),
        };
        let record = record_from_row(&state, &row);
        state.progress.push(row);
        Ok(record)
    }

    async fn complete_lesson(
        &self,
        credential: &Credential,
        progress: ProgressId,
        lesson: LessonId,
    ) -> Result<ProgressRecord, ApiError> {
        let mut state = self.locked()?;
        let username = authorize(&state, credential)?;
        take_injected(&mut state.fail_next_completion)?;
        let course_id = state
            .progress
            .iter()
            .find(|row| row.id == progress && row.username == username)
            .map(|row| row.course_id)
            .ok_or(ApiError::NotFound)?;
        let belongs = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .is_some_and(|course| course.lessons.iter().any(|l| l.id == lesson));
        if !belongs {
            return Err(ApiError::NotFound);
        }
        let row = state
            .progress
            .iter_mut()
            .find(|row| row.id == progress)
            .ok_or(ApiError::NotFound)?;
        row.lessons.push(lesson);
        let row = state
            .progress
            .iter()
            .find(|row| row.id == progress)
            .ok_or(ApiError::NotFound)?;
        Ok(record_from_row(&state, row))
    }

    async fn complete_assignment(
        &self,
        credential: &Credential,
        progress: ProgressId,
        assignment: AssignmentId,
    ) -> Result<ProgressRecord, ApiError> {
        let mut state = self.locked()?;
        let username = authorize(&state, credential)?;
        take_injected(&mut state.fail_next_completion)?;
        let course_id = state
            .progress
            .iter()
            .find(|row| row.id == progress && row.username == username)
            .map(|row| row.course_id)
            .ok_or(ApiError::NotFound)?;
        let belongs = state
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .is_some_and(|course| {
                course
                    .lessons
                    .iter()
                    .flat_map(|lesson| &lesson.assignments)
                    .any(|a| a.id == assignment)
            });
        if !belongs {
            return Err(ApiError::NotFound);
        }
        let row = state
            .progress
            .iter_mut()
            .find(|row| row.id == progress)
            .ok_or(ApiError::NotFound)?;
        row.assignments.push(assignment);
        let row = state
            .progress
            .iter()
            .find(|row| row.id == progress)
            .ok_or(ApiError::NotFound)?;
        Ok(record_from_row(&state, row))
    }
}

#[async_trait]
impl AuthApi for InMemoryApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let mut state = self.locked()?;
        if state.users.contains_key(&request.username) {
            return Err(ApiError::Rejected("username already taken".into()));
        }
        state.users.insert(
            request.username.clone(),
            UserRow {
                profile: UserProfile {
                    username: request.username.clone(),
                    email: request.email.clone(),
                    first_name: request.first_name.clone(),
                    last_name: request.last_name.clone(),
                    about: None,
                    date_joined: None,
                },
                password: request.password.clone(),
            },
        );
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        {
            let state = self.locked()?;
            let user = state
                .users
                .get(username)
                .ok_or_else(|| ApiError::Rejected("invalid credentials".into()))?;
            if user.password != password {
                return Err(ApiError::Rejected("invalid credentials".into()));
            }
        }
        Ok(self.issue_token(username))
    }

    async fn current_user(&self, credential: &Credential) -> Result<UserProfile, ApiError> {
        let state = self.locked()?;
        let username = authorize(&state, credential)?;
        state
            .users
            .get(&username)
            .map(|user| user.profile.clone())
            .ok_or(ApiError::Unauthenticated)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::Difficulty;

    fn sample_course() -> Course {
        Course {
            id: CourseId::new(7),
            title: "Rust basics".into(),
            description: "From zero".into(),
            difficulty: Difficulty::Beginner,
            instructor: Default::default(),
            lessons: vec![Lesson {
                id: LessonId::new(1),
                title: "Ownership".into(),
                content: "Moves and borrows".into(),
                assignments: vec![Assignment {
                    id: AssignmentId::new(11),
                    title: "Fix the borrow".into(),
                    description: String::new(),
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
            date_joined: None,
        }
    }

    #[tokio::test]
    async fn catalog_lookups_work() {
        let api = InMemoryApi::with_courses(vec![sample_course()]);
        assert_eq!(api.list_courses().await.unwrap().len(), 1);
        assert!(api.get_course(CourseId::new(7)).await.is_ok());
        assert!(api.get_lesson(LessonId::new(1)).await.is_ok());
        assert!(api.get_assignment(AssignmentId::new(11)).await.is_ok());
        assert!(matches!(
            api.get_course(CourseId::new(8)).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn progress_requires_a_known_token() {
        let api = InMemoryApi::with_courses(vec![sample_course()]);
        let bogus = Credential::new("nope");
        assert!(matches!(
            api.list_progress(&bogus).await,
            Err(ApiError::Unauthenticated)
        ));

        let credential = api.seed_user(learner(), "pw");
        assert!(api.list_progress(&credential).await.unwrap().is_empty());

        api.revoke(&credential);
        assert!(matches!(
            api.list_progress(&credential).await,
            Err(ApiError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn completion_appends_blindly() {
        let api = InMemoryApi::with_courses(vec![sample_course()]);
        let credential = api.seed_user(learner(), "pw");
        let record = api
            .create_progress(&credential, CourseId::new(7))
            .await
            .unwrap();
        api.complete_lesson(&credential, record.id, LessonId::new(1))
            .await
            .unwrap();
        let updated = api
            .complete_lesson(&credential, record.id, LessonId::new(1))
            .await
            .unwrap();

        // The store keeps both entries; set semantics are the client's job.
        assert_eq!(api.raw_lessons(record.id).len(), 2);
        assert_eq!(updated.into_progress().lessons_completed(), 1);
    }

    #[tokio::test]
    async fn unknown_lesson_is_rejected() {
        let api = InMemoryApi::with_courses(vec![sample_course()]);
        let credential = api.seed_user(learner(), "pw");
        let record = api
            .create_progress(&credential, CourseId::new(7))
            .await
            .unwrap();
        assert!(matches!(
            api.complete_lesson(&credential, record.id, LessonId::new(99))
                .await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn register_then_login_issues_a_token() {
        let api = InMemoryApi::new();
        let request = RegisterRequest {
            username: "grace".into(),
            email: "grace@example.com".into(),
            password: "pw".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
        };
        api.register(&request).await.unwrap();
        assert!(matches!(
            api.register(&request).await,
            Err(ApiError::Rejected(_))
        ));

        let credential = api.login("grace", "pw").await.unwrap();
        let user = api.current_user(&credential).await.unwrap();
        assert_eq!(user.username, "grace");

        assert!(matches!(
            api.login("grace", "wrong").await,
            Err(ApiError::Rejected(_))
        ));
    }
}
