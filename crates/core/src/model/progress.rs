use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::{AssignmentId, CourseId, LessonId, ProgressId};

//
// ─── COURSE REFERENCE ──────────────────────────────────────────────────────────
//

/// The course a progress record belongs to, as embedded by the remote store.
///
/// Carries just enough catalog data for display and percentages; set once at
/// creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    id: CourseId,
    title: String,
    total_lessons: usize,
}

impl CourseRef {
    #[must_use]
    pub fn new(id: CourseId, title: impl Into<String>, total_lessons: usize) -> Self {
        Self {
            id,
            title: title.into(),
            total_lessons,
        }
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.total_lessons
    }
}

/// A completed assignment as the remote store reports it: the id plus the
/// owning lesson and title the profile view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAssignment {
    pub id: AssignmentId,
    pub lesson: LessonId,
    pub title: String,
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// One learner's completion state for one course.
///
/// The only mutable entity the client owns. Both completion collections are
/// sets: marking an already-completed item again changes nothing, and nothing
/// is ever removed. Lessons and assignments are tracked independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    id: ProgressId,
    course: CourseRef,
    completed_lessons: BTreeSet<LessonId>,
    completed_assignments: BTreeMap<AssignmentId, CompletedAssignment>,
}

impl Progress {
    /// A freshly created record: empty completion state.
    #[must_use]
    pub fn new(id: ProgressId, course: CourseRef) -> Self {
        Self {
            id,
            course,
            completed_lessons: BTreeSet::new(),
            completed_assignments: BTreeMap::new(),
        }
    }

    /// Rebuild a record from remote data. Duplicate entries collapse; the
    /// store is not trusted to deduplicate.
    #[must_use]
    pub fn from_parts(
        id: ProgressId,
        course: CourseRef,
        lessons: impl IntoIterator<Item = LessonId>,
        assignments: impl IntoIterator<Item = CompletedAssignment>,
    ) -> Self {
        Self {
            id,
            course,
            completed_lessons: lessons.into_iter().collect(),
            completed_assignments: assignments
                .into_iter()
                .map(|assignment| (assignment.id, assignment))
                .collect(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ProgressId {
        self.id
    }

    #[must_use]
    pub fn course(&self) -> &CourseRef {
        &self.course
    }

    /// Records a lesson as completed. Returns `true` if the set changed.
    pub fn mark_lesson(&mut self, lesson: LessonId) -> bool {
        self.completed_lessons.insert(lesson)
    }

    /// Records an assignment as completed. Returns `true` if the set changed.
    /// Does not touch the lesson set.
    pub fn mark_assignment(&mut self, assignment: CompletedAssignment) -> bool {
        self.completed_assignments
            .insert(assignment.id, assignment)
            .is_none()
    }

    #[must_use]
    pub fn is_lesson_completed(&self, lesson: LessonId) -> bool {
        self.completed_lessons.contains(&lesson)
    }

    #[must_use]
    pub fn is_assignment_completed(&self, assignment: AssignmentId) -> bool {
        self.completed_assignments.contains_key(&assignment)
    }

    pub fn completed_lessons(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.completed_lessons.iter().copied()
    }

    pub fn completed_assignments(&self) -> impl Iterator<Item = &CompletedAssignment> {
        self.completed_assignments.values()
    }

    #[must_use]
    pub fn lessons_completed(&self) -> usize {
        self.completed_lessons.len()
    }

    #[must_use]
    pub fn assignments_completed(&self) -> usize {
        self.completed_assignments.len()
    }

    /// Share of the course's lessons completed, rounded to whole percent.
    /// A course with no lessons reports 0.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        let total = self.course.total_lessons();
        if total == 0 {
            return 0;
        }
        let done = self.completed_lessons.len().min(total);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = ((done as f64 / total as f64) * 100.0).round() as u8;
        percent
    }

    /// Whether every lesson of the course is completed. A course with no
    /// lessons is never reported complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let total = self.course.total_lessons();
        total > 0 && self.completed_lessons.len() >= total
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
