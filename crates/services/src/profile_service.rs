use std::sync::Arc;

use course_core::model::{Progress, UserProfile};
use course_core::Clock;

use crate::auth_service::AuthService;
use crate::error::ProfileError;
use crate::progress::ProgressTracker;

/// Derived statistics shown on the profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningStats {
    pub courses_completed: usize,
    pub lessons_completed: usize,
    pub assignments_completed: usize,
    pub days_on_platform: Option<i64>,
}

impl LearningStats {
    #[must_use]
    pub fn from_progress(
        user: &UserProfile,
        progress: &[Progress],
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            courses_completed: progress.iter().filter(|p| p.is_complete()).count(),
            lessons_completed: progress.iter().map(Progress::lessons_completed).sum(),
            assignments_completed: progress.iter().map(Progress::assignments_completed).sum(),
            days_on_platform: user.days_on_platform(now),
        }
    }
}

/// Everything the profile view renders in one load.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverview {
    pub user: UserProfile,
    pub progress: Vec<Progress>,
    pub stats: LearningStats,
}

/// Aggregates the signed-in learner's account data and progress records.
///
/// Plain arithmetic over what the other services return; nothing here talks
/// to the network directly.
#[derive(Clone)]
pub struct ProfileService {
    clock: Clock,
    auth: Arc<AuthService>,
    tracker: Arc<ProgressTracker>,
}

impl ProfileService {
    #[must_use]
    pub fn new(clock: Clock, auth: Arc<AuthService>, tracker: Arc<ProgressTracker>) -> Self {
        Self {
            clock,
            auth,
            tracker,
        }
    }

    /// Load the profile page's data.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` when either the account lookup or the progress
    /// listing fails; `is_unauthenticated` tells the view to redirect.
    pub async fn load(&self) -> Result<ProfileOverview, ProfileError> {
        let user = self.auth.current_user().await?;
        let progress = self.tracker.list().await?;
        let stats = LearningStats::from_progress(&user, &progress, self.clock.now());
        Ok(ProfileOverview {
            user,
            progress,
            stats,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
