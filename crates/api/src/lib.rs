#![forbid(unsafe_code)]

pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use error::ApiError;
pub use http::HttpApi;
pub use memory::InMemoryApi;
pub use store::{
    AuthApi, CatalogReader, CompletedAssignmentBrief, CourseBrief, LessonBrief, ProgressRecord,
    ProgressStore, RegisterRequest,
};
