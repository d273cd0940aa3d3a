use std::sync::Arc;

use api::store::CatalogReader;
use course_core::model::{Assignment, AssignmentId, Course, CourseId, CourseSummary, Lesson, LessonId};

use crate::error::CatalogError;

/// Read-only access to courses, lessons, and assignments.
///
/// The catalog is immutable input as far as this client is concerned; this
/// service only shapes errors for the views.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogReader>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// List all published courses.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on API failure.
    pub async fn list_courses(&self) -> Result<Vec<CourseSummary>, CatalogError> {
        Ok(self.catalog.list_courses().await?)
    }

    /// Fetch a course with its lessons and assignments.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub async fn get_course(&self, id: CourseId) -> Result<Course, CatalogError> {
        Ok(self.catalog.get_course(id).await?)
    }

    /// Fetch a lesson with its assignments.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub async fn get_lesson(&self, id: LessonId) -> Result<Lesson, CatalogError> {
        Ok(self.catalog.get_lesson(id).await?)
    }

    /// Fetch a single assignment.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, CatalogError> {
        Ok(self.catalog.get_assignment(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;

    #[tokio::test]
    async fn unknown_ids_surface_not_found() {
        let service = CatalogService::new(Arc::new(InMemoryApi::new()));
        assert!(matches!(
            service.get_course(CourseId::new(1)).await,
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(
            service.get_lesson(LessonId::new(1)).await,
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(
            service.get_assignment(AssignmentId::new(1)).await,
            Err(CatalogError::NotFound)
        ));
    }
}
