mod course_vm;
mod progress_vm;

pub use course_vm::{map_course_cards, parse_difficulty_filter, CourseCardVm};
pub use progress_vm::{
    map_course_progress, map_profile_header, map_recent_assignments, stats_lines,
    CourseProgressVm, ProfileHeaderVm, RecentAssignmentVm,
};
