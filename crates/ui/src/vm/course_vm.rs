use course_core::model::{CourseSummary, Difficulty};

/// UI-ready representation of a course card in the catalog list.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseCardVm {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub difficulty_label: &'static str,
}

impl CourseCardVm {
    #[must_use]
    pub fn matches_filter(&self, filter: Option<Difficulty>) -> bool {
        filter.is_none_or(|wanted| self.difficulty == wanted)
    }
}

/// Convert catalog summaries into card view models.
#[must_use]
pub fn map_course_cards(courses: &[CourseSummary]) -> Vec<CourseCardVm> {
    courses
        .iter()
        .map(|course| CourseCardVm {
            id: course.id.value(),
            title: course.title.clone(),
            description: course.description.clone(),
            difficulty: course.difficulty,
            difficulty_label: course.difficulty.label(),
        })
        .collect()
}

/// Parse the difficulty filter control's value. "all" (or anything
/// unrecognized) means no filter.
#[must_use]
pub fn parse_difficulty_filter(value: &str) -> Option<Difficulty> {
    match value {
        "beginner" => Some(Difficulty::Beginner),
        "intermediate" => Some(Difficulty::Intermediate),
        "advanced" => Some(Difficulty::Advanced),
        _ => None,
    }
}
