use chrono::{DateTime, Utc};
use course_core::model::{Progress, UserProfile};
use services::LearningStats;

/// One course row on the profile page: progress bar, labels, completion badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseProgressVm {
    pub course_id: u64,
    pub title: String,
    pub percent: u8,
    pub completed: bool,
    pub progress_label: String,
}

/// A recently completed assignment, linked back to its lesson.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentAssignmentVm {
    pub course_id: u64,
    pub lesson_id: u64,
    pub assignment_id: u64,
    pub title: String,
    pub course_title: String,
}

/// Convert progress records into profile course rows.
#[must_use]
pub fn map_course_progress(progress: &[Progress]) -> Vec<CourseProgressVm> {
    progress
        .iter()
        .map(|record| CourseProgressVm {
            course_id: record.course().id().value(),
            title: record.course().title().to_string(),
            percent: record.percent_complete(),
            completed: record.is_complete(),
            progress_label: format!(
                "{} of {} lessons",
                record.lessons_completed(),
                record.course().total_lessons()
            ),
        })
        .collect()
}

/// Flatten completed assignments across all courses for the profile list.
#[must_use]
pub fn map_recent_assignments(progress: &[Progress]) -> Vec<RecentAssignmentVm> {
    progress
        .iter()
        .flat_map(|record| {
            record.completed_assignments().map(|assignment| RecentAssignmentVm {
                course_id: record.course().id().value(),
                lesson_id: assignment.lesson.value(),
                assignment_id: assignment.id.value(),
                title: assignment.title.clone(),
                course_title: record.course().title().to_string(),
            })
        })
        .collect()
}

/// Header labels for the profile identity card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileHeaderVm {
    pub name: String,
    pub email: String,
    pub about: String,
    pub member_since: Option<String>,
}

#[must_use]
pub fn map_profile_header(user: &UserProfile) -> ProfileHeaderVm {
    ProfileHeaderVm {
        name: user.display_name(),
        email: user.email.clone(),
        about: user
            .about
            .clone()
            .unwrap_or_else(|| "Tell other learners about yourself.".to_string()),
        member_since: user
            .date_joined
            .map(|joined: DateTime<Utc>| format!("Member since {}", joined.format("%Y-%m-%d"))),
    }
}

/// Statistics lines under the identity card.
#[must_use]
pub fn stats_lines(stats: &LearningStats) -> Vec<String> {
    let mut lines = vec![
        format!("Courses completed: {}", stats.courses_completed),
        format!("Lessons completed: {}", stats.lessons_completed),
        format!("Assignments completed: {}", stats.assignments_completed),
    ];
    if let Some(days) = stats.days_on_platform {
        lines.push(format!("Days on the platform: {days}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{
        AssignmentId, CompletedAssignment, CourseId, CourseRef, LessonId, Progress, ProgressId,
    };

    fn record() -> Progress {
        Progress::from_parts(
            ProgressId::new(1),
            CourseRef::new(CourseId::new(7), "Rust basics", 2),
            vec![LessonId::new(1)],
            vec![CompletedAssignment {
                id: AssignmentId::new(11),
                lesson: LessonId::new(1),
                title: "Fix the borrow".into(),
            }],
        )
    }

    #[test]
    fn maps_progress_to_course_rows() {
        let rows = map_course_progress(&[record()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percent, 50);
        assert!(!rows[0].completed);
        assert_eq!(rows[0].progress_label, "1 of 2 lessons");
    }

    #[test]
    fn flattens_recent_assignments() {
        let recent = map_recent_assignments(&[record()]);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Fix the borrow");
        assert_eq!(recent[0].course_title, "Rust basics");
        assert_eq!(recent[0].lesson_id, 1);
    }

    #[test]
    fn stats_lines_skip_missing_join_date() {
        let stats = LearningStats {
            courses_completed: 1,
            lessons_completed: 2,
            assignments_completed: 3,
            days_on_platform: None,
        };
        let lines = stats_lines(&stats);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Courses completed: 1");
    }
}
