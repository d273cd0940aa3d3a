use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use course_core::model::{
    Assignment, AssignmentId, CompletedAssignment, Course, CourseId, CourseRef, CourseSummary,
    Credential, Lesson, LessonId, Progress, ProgressId, UserProfile,
};

use crate::error::ApiError;

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

/// Lesson reference as embedded in progress payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonBrief {
    pub id: LessonId,
    #[serde(default)]
    pub title: String,
}

/// The course reference a progress payload embeds: enough for titles and
/// lesson totals, not the full catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseBrief {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonBrief>,
}

/// A completed assignment as serialized by the store: id, owning lesson, title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAssignmentBrief {
    pub id: AssignmentId,
    pub lesson: LessonId,
    #[serde(default)]
    pub title: String,
}

/// Persisted shape of a progress record, as the remote store returns it.
///
/// This mirrors the wire payload so the HTTP layer can deserialize without
/// leaking transport concerns into the domain; `into_progress` applies the
/// client's set semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: ProgressId,
    pub course: CourseBrief,
    #[serde(default)]
    pub completed_lessons: Vec<LessonBrief>,
    #[serde(default)]
    pub completed_assignments: Vec<CompletedAssignmentBrief>,
}

impl ProgressRecord {
    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course.id
    }

    /// Convert the record into the domain `Progress`.
    ///
    /// Duplicate completion entries collapse here; the remote store is not
    /// trusted to deduplicate.
    #[must_use]
    pub fn into_progress(self) -> Progress {
        let course = CourseRef::new(self.course.id, self.course.title, self.course.lessons.len());
        Progress::from_parts(
            self.id,
            course,
            self.completed_lessons.into_iter().map(|lesson| lesson.id),
            self.completed_assignments
                .into_iter()
                .map(|assignment| CompletedAssignment {
                    id: assignment.id,
                    lesson: assignment.lesson,
                    title: assignment.title,
                }),
        )
    }
}

/// Payload for account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Read-only access to the course catalog. No credential required.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// List all published courses.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decode failure.
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ApiError>;

    /// Fetch a course with its lessons and assignments.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or other API errors.
    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError>;

    /// Fetch a lesson with its assignments.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or other API errors.
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError>;

    /// Fetch a single assignment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or other API errors.
    async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, ApiError>;
}

/// The learner's progress collection. Every call requires a credential; the
/// store answers 401/403 (`ApiError::Unauthenticated`) when it is rejected.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch all of the learner's progress records.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` for a rejected credential, or
    /// other API errors.
    async fn list_progress(&self, credential: &Credential)
    -> Result<Vec<ProgressRecord>, ApiError>;

    /// Create an empty progress record for a course.
    ///
    /// The store offers no upsert; callers are responsible for not creating
    /// a second record for the same course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown course, or other API errors.
    async fn create_progress(
        &self,
        credential: &Credential,
        course: CourseId,
    ) -> Result<ProgressRecord, ApiError>;

    /// Mark a lesson complete on an existing record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown record or lesson, or
    /// other API errors.
    async fn complete_lesson(
        &self,
        credential: &Credential,
        progress: ProgressId,
        lesson: LessonId,
    ) -> Result<ProgressRecord, ApiError>;

    /// Mark an assignment complete on an existing record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown record or assignment, or
    /// other API errors.
    async fn complete_assignment(
        &self,
        credential: &Credential,
        progress: ProgressId,
        assignment: AssignmentId,
    ) -> Result<ProgressRecord, ApiError>;
}

/// Account endpoints: registration, token issuance, current-user lookup.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the server's message on validation
    /// failure, or other API errors.
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;

    /// Exchange username/password for a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the credentials are rejected or on transport
    /// failure.
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError>;

    /// Fetch the signed-in learner's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` for a rejected credential, or
    /// other API errors.
    async fn current_user(&self, credential: &Credential) -> Result<UserProfile, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_duplicates() -> ProgressRecord {
        ProgressRecord {
            id: ProgressId::new(5),
            course: CourseBrief {
                id: CourseId::new(7),
                title: "Rust basics".into(),
                lessons: vec![
                    LessonBrief {
                        id: LessonId::new(1),
                        title: "Ownership".into(),
                    },
                    LessonBrief {
                        id: LessonId::new(2),
                        title: "Borrowing".into(),
                    },
                ],
            },
            completed_lessons: vec![
                LessonBrief {
                    id: LessonId::new(1),
                    title: String::new(),
                },
                LessonBrief {
                    id: LessonId::new(1),
                    title: String::new(),
                },
            ],
            completed_assignments: vec![CompletedAssignmentBrief {
                id: AssignmentId::new(11),
                lesson: LessonId::new(1),
                title: "Fix the borrow".into(),
            }],
        }
    }

    #[test]
    fn conversion_deduplicates_completed_lessons() {
        let progress = record_with_duplicates().into_progress();
        assert_eq!(progress.lessons_completed(), 1);
        assert_eq!(progress.assignments_completed(), 1);
        assert_eq!(progress.course().total_lessons(), 2);
        assert_eq!(progress.percent_complete(), 50);
    }

    #[test]
    fn record_deserializes_remote_payload() {
        let json = r#"{
            "id": 3,
            "course": {"id": 7, "title": "Rust basics", "lessons": [{"id": 1, "title": "Ownership"}]},
            "completed_lessons": [{"id": 1, "title": "Ownership"}],
            "completed_assignments": [{"id": 11, "lesson": 1, "title": "Fix the borrow"}]
        }"#;
        let record: ProgressRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.course_id(), CourseId::new(7));
        let progress = record.into_progress();
        assert!(progress.is_lesson_completed(LessonId::new(1)));
        assert!(progress.is_assignment_completed(AssignmentId::new(11)));
    }
}
