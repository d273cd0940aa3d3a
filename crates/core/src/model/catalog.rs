use serde::{Deserialize, Serialize};

use crate::model::ids::{AssignmentId, CourseId, LessonId};

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Advertised difficulty of a course.
///
/// The catalog may grow new levels; anything unrecognized maps to `Unknown`
/// instead of failing the whole course list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    /// Human-readable label for list filters and course cards.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Unknown => "Unrated",
        }
    }
}

//
// ─── CATALOG TYPES ─────────────────────────────────────────────────────────────
//

/// Course instructor, for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Instructor {
    /// "First Last", trimmed when either part is missing.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Entry in the course list, without nested lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// A full course: ordered lessons, each with its ordered assignments.
///
/// Immutable from the client's perspective; the catalog owns this data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub instructor: Instructor,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Course {
    /// Looks a lesson up by id within this course.
    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

/// A lesson: free-text content plus its practice assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// A practice assignment attached to a lesson.
///
/// `test_cases` is a structured payload the client passes through verbatim;
/// its shape is owned by the grading backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub test_cases: serde_json::Value,
    #[serde(default)]
    pub solution_template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_lowercase_names() {
        let d: Difficulty = serde_json::from_str("\"beginner\"").unwrap();
        assert_eq!(d, Difficulty::Beginner);
    }

    #[test]
    fn unknown_difficulty_does_not_fail_deserialization() {
        let d: Difficulty = serde_json::from_str("\"legendary\"").unwrap();
        assert_eq!(d, Difficulty::Unknown);
    }

    #[test]
    fn course_deserializes_with_nested_lessons() {
        let json = r#"{
            "id": 7,
            "title": "Rust basics",
            "description": "From zero",
            "difficulty": "intermediate",
            "instructor": {"first_name": "Grace", "last_name": "Hopper"},
            "lessons": [
                {
                    "id": 1,
                    "title": "Ownership",
                    "content": "Moves and borrows",
                    "assignments": [
                        {
                            "id": 11,
                            "title": "Fix the borrow",
                            "description": "Make it compile",
                            "test_cases": [{"input": "x", "expected": "y"}],
                            "solution_template": "fn main() {}"
                        }
                    ]
                }
            ]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, CourseId::new(7));
        assert_eq!(course.lesson_count(), 1);
        assert_eq!(course.instructor.full_name(), "Grace Hopper");
        let lesson = course.lesson(LessonId::new(1)).unwrap();
        assert_eq!(lesson.assignments.len(), 1);
        assert!(course.lesson(LessonId::new(2)).is_none());
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": 1, "title": "Bare"}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.difficulty, Difficulty::Unknown);
        assert!(course.lessons.is_empty());
        assert_eq!(course.instructor.full_name(), "");
    }
}
