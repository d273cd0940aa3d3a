use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use api::store::{ProgressRecord, ProgressStore};
use api::ApiError;
use course_core::model::{AssignmentId, CourseId, Credential, LessonId, Progress, ProgressId};

use crate::error::ProgressError;
use crate::session::SessionContext;

/// Per-course slot of the identifier cache. The async mutex is held across
/// the whole check-then-create sequence, so the first in-flight `ensure` for
/// a course is authoritative and concurrent callers await its outcome.
type Slot = Arc<AsyncMutex<Option<ProgressId>>>;

/// Maintains the mapping from (learner, course) to the learner's progress
/// record and applies completion mutations against it.
///
/// The backing store offers no upsert, so records are created lazily on the
/// first completion event and the assigned identifier is cached for the rest
/// of the session; a second blind create would violate the one-record-per-
/// course invariant. Creation failures leave the cache empty, which makes
/// re-invoking any operation safe.
pub struct ProgressTracker {
    session: SessionContext,
    store: Arc<dyn ProgressStore>,
    slots: Mutex<HashMap<CourseId, Slot>>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(session: SessionContext, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            session,
            store,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached identifier. Call when the signed-in learner
    /// changes; the cache maps the previous learner's records.
    pub fn reset(&self) {
        self.slots.lock().expect("slot map lock").clear();
    }

    /// Find the learner's progress record for a course.
    ///
    /// `Ok(None)` is the normal outcome for a course the learner has not
    /// started; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unauthenticated` without any network access
    /// when no credential is held, and propagates store failures.
    pub async fn resolve(&self, course: CourseId) -> Result<Option<Progress>, ProgressError> {
        let credential = self.credential()?;
        let records = self
            .store
            .list_progress(&credential)
            .await
            .map_err(|err| self.fail(err))?;
        Ok(records
            .into_iter()
            .find(|record| record.course_id() == course)
            .map(ProgressRecord::into_progress))
    }

    /// Resolve the record for a course, creating it if none exists yet.
    ///
    /// Repeated calls for the same course perform at most one creation per
    /// session; the first successful call caches the record identifier.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unauthenticated` without network access when
    /// no credential is held; `NotFound` when the course is unknown to the
    /// store; transport failures otherwise. A failed creation caches
    /// nothing, so the call can simply be re-invoked.
    pub async fn ensure(&self, course: CourseId) -> Result<Progress, ProgressError> {
        self.credential()?;
        let slot = self.slot(course);
        let mut cached = slot.lock().await;
        self.ensure_locked(course, &mut cached).await
    }

    /// Mark a lesson complete, creating the progress record first if needed.
    ///
    /// Creation (when required) strictly precedes the completion mutation.
    /// If the mutation fails after a fresh creation, the identifier is
    /// already cached, so re-invoking performs only the mutation step.
    /// Marking an already-completed lesson changes nothing.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ensure`](Self::ensure); nothing is retried
    /// automatically.
    pub async fn complete_lesson(
        &self,
        course: CourseId,
        lesson: LessonId,
    ) -> Result<Progress, ProgressError> {
        self.credential()?;
        let slot = self.slot(course);
        let mut cached = slot.lock().await;
        let id = match *cached {
            Some(id) => id,
            None => self.ensure_locked(course, &mut cached).await?.id(),
        };
        let credential = self.credential()?;
        let record = self
            .store
            .complete_lesson(&credential, id, lesson)
            .await
            .map_err(|err| self.fail(err))?;
        Ok(record.into_progress())
    }

    /// Mark an assignment complete, creating the progress record first if
    /// needed.
    ///
    /// Completing an assignment never touches the completed-lesson set, and
    /// vice versa; callers wanting a policy across the two enforce it
    /// themselves.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ensure`](Self::ensure).
    pub async fn complete_assignment(
        &self,
        course: CourseId,
        assignment: AssignmentId,
    ) -> Result<Progress, ProgressError> {
        self.credential()?;
        let slot = self.slot(course);
        let mut cached = slot.lock().await;
        let id = match *cached {
            Some(id) => id,
            None => self.ensure_locked(course, &mut cached).await?.id(),
        };
        let credential = self.credential()?;
        let record = self
            .store
            .complete_assignment(&credential, id, assignment)
            .await
            .map_err(|err| self.fail(err))?;
        Ok(record.into_progress())
    }

    /// All of the learner's progress records, for the profile view.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unauthenticated` without network access when
    /// no credential is held, and propagates store failures.
    pub async fn list(&self) -> Result<Vec<Progress>, ProgressError> {
        let credential = self.credential()?;
        let records = self
            .store
            .list_progress(&credential)
            .await
            .map_err(|err| self.fail(err))?;
        Ok(records
            .into_iter()
            .map(ProgressRecord::into_progress)
            .collect())
    }

    async fn ensure_locked(
        &self,
        course: CourseId,
        cached: &mut Option<ProgressId>,
    ) -> Result<Progress, ProgressError> {
        if cached.is_some() {
            // Already resolved this session. Out-of-band deletion is outside
            // this client's scope; surface it rather than create a duplicate.
            return self
                .resolve(course)
                .await?
                .ok_or(ProgressError::NotFound);
        }

        if let Some(progress) = self.resolve(course).await? {
            *cached = Some(progress.id());
            return Ok(progress);
        }

        let credential = self.credential()?;
        debug!(%course, "creating progress record");
        let record = self
            .store
            .create_progress(&credential, course)
            .await
            .map_err(|err| self.fail(err))?;
        let progress = record.into_progress();
        *cached = Some(progress.id());
        Ok(progress)
    }

    fn slot(&self, course: CourseId) -> Slot {
        let mut slots = self.slots.lock().expect("slot map lock");
        Arc::clone(slots.entry(course).or_default())
    }

    fn credential(&self) -> Result<Credential, ProgressError> {
        self.session
            .credential()
            .ok_or(ProgressError::Unauthenticated)
    }

    fn fail(&self, err: ApiError) -> ProgressError {
        if matches!(err, ApiError::Unauthenticated) {
            // The server rejected the token; force re-authentication. The
            // identifier cache stays valid for this learner.
            self.session.clear();
        }
        ProgressError::from(err)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use course_core::model::{Assignment, Course, Difficulty, Instructor, Lesson, UserProfile};

    const COURSE: CourseId = CourseId::new(7);
    const LESSON_1: LessonId = LessonId::new(1);
    const LESSON_2: LessonId = LessonId::new(2);
    const ASSIGNMENT_3: AssignmentId = AssignmentId::new(3);

    fn course() -> Course {
        Course {
            id: COURSE,
            title: "Rust basics".into(),
            description: "From zero".into(),
            difficulty: Difficulty::Beginner,
            instructor: Instructor::default(),
            lessons: vec![
                Lesson {
                    id: LESSON_1,
                    title: "Ownership".into(),
                    content: String::new(),
                    assignments: vec![Assignment {
                        id: ASSIGNMENT_3,
                        title: "Fix the borrow".into(),
                        description: String::new(),
                        test_cases: serde_json::Value::Null,
                        solution_template: String::new(),
                    }],
                },
                Lesson {
                    id: LESSON_2,
                    title: "Borrowing".into(),
                    content: String::new(),
                    assignments: Vec::new(),
                },
            ],
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

    fn setup() -> (Arc<InMemoryApi>, SessionContext, ProgressTracker) {
        let store = Arc::new(InMemoryApi::with_courses(vec![course()]));
        let credential = store.seed_user(learner(), "pw");
        let session = SessionContext::with_credential(credential);
        let store_dyn: Arc<dyn api::ProgressStore> = store.clone();
        let tracker = ProgressTracker::new(session.clone(), store_dyn);
        (store, session, tracker)
    }

    #[tokio::test]
    async fn signed_out_calls_never_touch_the_network() {
        let (store, session, tracker) = setup();
        session.clear();

        assert!(matches!(
            tracker.resolve(COURSE).await,
            Err(ProgressError::Unauthenticated)
        ));
        assert!(matches!(
            tracker.ensure(COURSE).await,
            Err(ProgressError::Unauthenticated)
        ));
        assert!(matches!(
            tracker.complete_lesson(COURSE, LESSON_1).await,
            Err(ProgressError::Unauthenticated)
        ));
        assert!(matches!(
            tracker.complete_assignment(COURSE, ASSIGNMENT_3).await,
            Err(ProgressError::Unauthenticated)
        ));

        assert_eq!(store.list_calls(), 0);
        assert_eq!(store.create_calls(), 0);
    }

    #[tokio::test]
    async fn resolve_reports_absence_as_a_normal_outcome() {
        let (_store, _session, tracker) = setup();
        assert!(tracker.resolve(COURSE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_completion_creates_then_mutates() {
        let (store, _session, tracker) = setup();

        let progress = tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();

        assert_eq!(store.create_calls(), 1);
        assert_eq!(store.record_count(), 1);
        assert!(progress.is_lesson_completed(LESSON_1));
        assert_eq!(progress.lessons_completed(), 1);
        assert_eq!(progress.assignments_completed(), 0);
    }

    #[tokio::test]
    async fn repeated_completion_is_idempotent_and_creates_nothing() {
        let (store, _session, tracker) = setup();

        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();
        let again = tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();

        // The store keeps whatever it wants; the returned record is a set.
        assert_eq!(again.lessons_completed(), 1);
        assert!(again.is_lesson_completed(LESSON_1));
        assert_eq!(store.create_calls(), 1);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn lesson_and_assignment_completion_are_independent() {
        let (_store, _session, tracker) = setup();

        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();
        let progress = tracker
            .complete_assignment(COURSE, ASSIGNMENT_3)
            .await
            .unwrap();

        assert!(progress.is_lesson_completed(LESSON_1));
        assert!(progress.is_assignment_completed(ASSIGNMENT_3));
        // Completing the assignment did not mark its owning lesson done.
        assert_eq!(progress.lessons_completed(), 1);
        assert!(!progress.is_lesson_completed(LESSON_2));
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let (store, _session, tracker) = setup();

        let first = tracker.ensure(COURSE).await.unwrap();
        let second = tracker.ensure(COURSE).await.unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_completions_create_at_most_one_record() {
        let (store, _session, tracker) = setup();

        let (a, b) = tokio::join!(
            tracker.complete_lesson(COURSE, LESSON_1),
            tracker.complete_lesson(COURSE, LESSON_2),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(store.create_calls(), 1);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn failed_mutation_after_creation_retries_without_a_second_create() {
        let (store, _session, tracker) = setup();
        store.fail_next_completion(ApiError::Transport("connection reset".into()));

        let err = tracker.complete_lesson(COURSE, LESSON_1).await.unwrap_err();
        assert!(matches!(err, ProgressError::Api(_)));

        // Creation completed before the mutation was issued: the record
        // exists and is still empty.
        assert_eq!(store.create_calls(), 1);
        assert_eq!(store.record_count(), 1);
        let resolved = tracker.resolve(COURSE).await.unwrap().unwrap();
        assert_eq!(resolved.lessons_completed(), 0);

        // Retry performs only the mutation step.
        let progress = tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();
        assert_eq!(store.create_calls(), 1);
        assert!(progress.is_lesson_completed(LESSON_1));
    }

    #[tokio::test]
    async fn failed_creation_caches_nothing() {
        let (store, _session, tracker) = setup();
        store.fail_next_create(ApiError::Transport("connection reset".into()));

        assert!(tracker.ensure(COURSE).await.is_err());
        assert_eq!(store.record_count(), 0);

        // Safe to retry from scratch; this creation is the one that sticks.
        let progress = tracker.ensure(COURSE).await.unwrap();
        assert_eq!(store.record_count(), 1);
        assert_eq!(progress.lessons_completed(), 0);
    }

    #[tokio::test]
    async fn rejected_credential_clears_session_but_keeps_the_cache() {
        let (store, session, tracker) = setup();

        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();
        assert_eq!(store.create_calls(), 1);

        let credential = session.credential().unwrap();
        store.revoke(&credential);

        let err = tracker.complete_lesson(COURSE, LESSON_2).await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert!(!session.is_authenticated());

        // Re-authenticate; the cached identifier is still used.
        let fresh = store.seed_user(learner(), "pw");
        session.set(fresh);
        let progress = tracker.complete_lesson(COURSE, LESSON_2).await.unwrap();
        assert_eq!(store.create_calls(), 1);
        assert!(progress.is_lesson_completed(LESSON_1));
        assert!(progress.is_lesson_completed(LESSON_2));
    }

    #[tokio::test]
    async fn unknown_lesson_surfaces_not_found() {
        let (_store, _session, tracker) = setup();
        let err = tracker
            .complete_lesson(COURSE, LessonId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::NotFound));
    }

    #[tokio::test]
    async fn reset_forgets_cached_identifiers() {
        let (store, session, tracker) = setup();
        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();

        // A different learner signs in; their first completion must create
        // their own record instead of mutating the previous learner's.
        tracker.reset();
        let other = store.seed_user(
            UserProfile {
                username: "ada".into(),
                email: "ada@example.com".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                about: None,
                date_joined: None,
            },
            "pw",
        );
        session.set(other);

        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();
        assert_eq!(store.create_calls(), 2);
        assert_eq!(store.record_count(), 2);
    }

    #[tokio::test]
    async fn list_returns_every_record() {
        let (_store, _session, tracker) = setup();
        tracker.complete_lesson(COURSE, LESSON_1).await.unwrap();

        let all = tracker.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].course().id(), COURSE);
        assert_eq!(all[0].course().total_lessons(), 2);
    }
}
