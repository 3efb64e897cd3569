use bookshelf_http::error::AppError;
use thiserror::Error;

/// Failures of book operations
#[derive(Error, Debug)]
pub enum BookError {
    #[error("{0}")]
    Validation(String),

    #[error("book '{0}' not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type BookResult<T> = Result<T, BookError>;

impl From<BookError> for AppError {
    fn from(error: BookError) -> Self {
        match error {
            BookError::Validation(message) => AppError::validation(message),
            e @ BookError::NotFound(_) => AppError::not_found(e.to_string()),
            e @ BookError::Storage(_) => AppError::Internal(e.into()),
        }
    }
}
