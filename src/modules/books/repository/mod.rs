use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use super::{
    error::BookResult,
    models::{Book, CreateBook, UpdateBook},
};

/// In-memory repository implementation.
pub mod memory;
/// PostgreSQL repository implementation.
pub mod postgres;

pub use memory::MemoryBookRepository;
pub use postgres::PostgresBookRepository;

/// Persistence interface for books and their authors.
///
/// Authors are keyed by first and last name: creating or updating a book with
/// a known author reuses the existing author instead of adding a new one.
#[async_trait]
pub trait BookRepository: Debug {
    /// Lists every book with its author, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Storage`](super::error::BookError::Storage) if the query fails.
    async fn list(&self) -> BookResult<Vec<Book>>;

    /// Fetches one book by identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no book has this identifier.
    async fn get(&self, id: &str) -> BookResult<Book>;

    /// Upserts the author and inserts the book atomically, assigning a new identifier.
    async fn create(&self, book: CreateBook) -> BookResult<Book>;

    /// Applies the provided fields to an existing book.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no book has this identifier.
    async fn update(&self, id: &str, changes: UpdateBook) -> BookResult<Book>;

    /// Removes a book. Deleting an unknown identifier succeeds.
    async fn delete(&self, id: &str) -> BookResult<()>;
}

/// Thread-safe shared reference to a book repository.
pub type BookRepositoryArc = Arc<dyn BookRepository + Send + Sync>;

/// Generates a new book identifier.
pub(crate) fn new_book_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
