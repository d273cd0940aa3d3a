use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use async_trait::async_trait;

use course_core::model::{
    Assignment, AssignmentId, Course, CourseId, CourseSummary, Credential, Lesson, LessonId,
    ProgressId, UserProfile,
};

use crate::error::ApiError;
use crate::store::{AuthApi, CatalogReader, ProgressRecord, ProgressStore, RegisterRequest};

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// HTTP implementation of the data API.
///
/// Paths and verbs follow the platform backend: `api/courses/`,
/// `api/progress/`, `api/progress/{id}/complete_lesson/`, `api/auth/*`.
/// Authenticated calls send `Authorization: Token <credential>`.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Build a client against the given base URL (e.g. `http://localhost:8000/`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join treats "api/x" as a sibling unless the base path ends in "/".
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: Option<&Credential>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.get(url);
        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, auth_value(credential));
        }
        let response = request.send().await?;
        let response = Self::check(path, response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        credential: Option<&Credential>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.post(path, credential, body).await?;
        Ok(response.json().await?)
    }

    async fn post(
        &self,
        path: &str,
        credential: Option<&Credential>,
        body: &(impl Serialize + ?Sized),
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.post(url).json(body);
        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, auth_value(credential));
        }
        let response = request.send().await?;
        Self::check(path, response).await
    }

    async fn check(path: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            debug!(path, %status, "request ok");
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = status_error(status, &body);
        warn!(path, %status, error = %err, "request failed");
        Err(err)
    }
}

fn auth_value(credential: &Credential) -> String {
    format!("Token {}", credential.expose())
}

/// Map a non-success status to the error taxonomy. 401/403 mean the
/// credential is missing or rejected; 404 means the referenced entity is
/// unknown; other client errors carry the server's message when it sends one.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthenticated,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        status if status.is_client_error() => {
            ApiError::Rejected(extract_message(body).unwrap_or_else(|| status.to_string()))
        }
        status => ApiError::Transport(format!("server returned {status}")),
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "detail"] {
        if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}

//
// ─── REQUEST BODIES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct CreateProgressBody {
    course_id: CourseId,
}

#[derive(Debug, Serialize)]
struct CompleteLessonBody {
    lesson_id: LessonId,
}

#[derive(Debug, Serialize)]
struct CompleteAssignmentBody {
    assignment_id: AssignmentId,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct LoginResponse {
    token: String,
}

//
// ─── TRAIT IMPLS ───────────────────────────────────────────────────────────────
//

#[async_trait]
impl CatalogReader for HttpApi {
    async fn list_courses(&self) -> Result<Vec<CourseSummary>, ApiError> {
        self.get_json("api/courses/", None).await
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        self.get_json(&format!("api/courses/{id}/"), None).await
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        self.get_json(&format!("api/lessons/{id}/"), None).await
    }

    async fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, ApiError> {
        self.get_json(&format!("api/assignments/{id}/"), None).await
    }
}

#[async_trait]
impl ProgressStore for HttpApi {
    async fn list_progress(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ProgressRecord>, ApiError> {
        self.get_json("api/progress/", Some(credential)).await
    }

    async fn create_progress(
        &self,
        credential: &Credential,
        course: CourseId,
    ) -> Result<ProgressRecord, ApiError> {
        self.post_json(
            "api/progress/",
            Some(credential),
            &CreateProgressBody { course_id: course },
        )
        .await
    }

    async fn complete_lesson(
        &self,
        credential: &Credential,
        progress: ProgressId,
        lesson: LessonId,
    ) -> Result<ProgressRecord, ApiError> {
        self.post_json(
            &format!("api/progress/{progress}/complete_lesson/"),
            Some(credential),
            &CompleteLessonBody { lesson_id: lesson },
        )
        .await
    }

    async fn complete_assignment(
        &self,
        credential: &Credential,
        progress: ProgressId,
        assignment: AssignmentId,
    ) -> Result<ProgressRecord, ApiError> {
        self.post_json(
            &format!("api/progress/{progress}/complete_assignment/"),
            Some(credential),
            &CompleteAssignmentBody {
                assignment_id: assignment,
            },
        )
        .await
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.post("api/auth/register/", None, request).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let response: LoginResponse = self
            .post_json("api/auth/login/", None, &LoginBody { username, password })
            .await?;
        Ok(Credential::new(response.token))
    }

    async fn current_user(&self, credential: &Credential) -> Result<UserProfile, ApiError> {
        self.get_json("api/auth/user/", Some(credential)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = HttpApi::new(Url::parse("http://localhost:8000/platform").unwrap());
        let url = api.endpoint("api/courses/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/platform/api/courses/");
    }

    #[test]
    fn unauthorized_and_forbidden_map_to_unauthenticated() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            ApiError::Unauthenticated
        ));
    }

    #[test]
    fn missing_entity_maps_to_not_found() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "{}"),
            ApiError::NotFound
        ));
    }

    #[test]
    fn client_errors_carry_the_server_message() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"message": "username taken"}"#);
        match err {
            ApiError::Rejected(message) => assert_eq!(message, "username taken"),
            other => panic!("unexpected: {other:?}"),
        }

        let err = status_error(StatusCode::BAD_REQUEST, r#"{"detail": "bad payload"}"#);
        match err {
            ApiError::Rejected(message) => assert_eq!(message, "bad payload"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn server_errors_map_to_transport() {
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::Transport(_)
        ));
    }
}
