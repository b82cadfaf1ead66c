use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Category with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Category cannot be its own parent")]
    SelfParent,

    #[error("Cannot set a descendant category as parent (circular reference)")]
    CircularReference,

    #[error("Cannot delete category with {0} subcategories")]
    HasChildren(u64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

/// Convert CategoryError to AppError for standardized error responses
impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => AppError::NotFound("Category not found".to_string()),
            CategoryError::ParentNotFound(_) => {
                AppError::NotFound("Parent category does not exist".to_string())
            }
            err @ (CategoryError::DuplicateName(_)
            | CategoryError::DuplicateSlug(_)
            | CategoryError::SelfParent
            | CategoryError::CircularReference) => AppError::BadRequest(err.to_string()),
            CategoryError::HasChildren(_) => AppError::BadRequest(
                "Cannot delete category with subcategories. Delete or move subcategories first."
                    .to_string(),
            ),
            CategoryError::Validation(msg) => AppError::InvalidInput(msg),
            CategoryError::Database(msg) => AppError::Database(msg),
            CategoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CategoryError {
    fn from(err: mongodb::error::Error) -> Self {
        CategoryError::Database(err.to_string())
    }
}

/// MongoDB duplicate key server error
const DUPLICATE_KEY: i32 = 11000;

/// Returns the server message when `err` is a unique index violation.
pub(crate) fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.as_str())
        }
        _ => None,
    }
}
