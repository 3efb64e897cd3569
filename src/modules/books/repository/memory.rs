use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{new_book_id, BookRepository};
use crate::modules::books::{
    error::{BookError, BookResult},
    models::{Author, Book, CreateBook, UpdateBook},
};

#[derive(Debug, Clone)]
struct BookRecord {
    isbn: String,
    title: String,
    author_id: usize,
}

#[derive(Debug, Default)]
struct State {
    // Keyed by UUIDv7, so iteration follows creation order
    books: BTreeMap<String, BookRecord>,
    authors: Vec<Author>,
    author_ids: HashMap<Author, usize>,
}

impl State {
    fn upsert_author(&mut self, author: Author) -> usize {
        if let Some(&id) = self.author_ids.get(&author) {
            return id;
        }
        let id = self.authors.len();
        self.authors.push(author.clone());
        self.author_ids.insert(author, id);
        id
    }

    fn to_book(&self, id: &str, record: &BookRecord) -> Book {
        Book {
            id: id.to_string(),
            isbn: record.isbn.clone(),
            title: record.title.clone(),
            author: self.authors[record.author_id].clone(),
        }
    }
}

/// In-memory implementation of the book repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookRepository {
    state: Arc<RwLock<State>>,
}

impl MemoryBookRepository {
    /// Creates a new empty memory book repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct authors stored.
    #[cfg(test)]
    pub(crate) async fn author_count(&self) -> usize {
        self.state.read().await.authors.len()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn list(&self) -> BookResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(state
            .books
            .iter()
            .map(|(id, record)| state.to_book(id, record))
            .collect())
    }

    async fn get(&self, id: &str) -> BookResult<Book> {
        let state = self.state.read().await;
        state
            .books
            .get(id)
            .map(|record| state.to_book(id, record))
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    async fn create(&self, book: CreateBook) -> BookResult<Book> {
        let mut state = self.state.write().await;
        let author_id = state.upsert_author(book.author.clone());
        let id = new_book_id();

        state.books.insert(
            id.clone(),
            BookRecord {
                isbn: book.isbn.clone(),
                title: book.title.clone(),
                author_id,
            },
        );

        Ok(Book {
            id,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
        })
    }

    async fn update(&self, id: &str, changes: UpdateBook) -> BookResult<Book> {
        let mut state = self.state.write().await;
        let mut record = state
            .books
            .get(id)
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        if let Some(isbn) = changes.isbn {
            record.isbn = isbn;
        }
        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(author) = changes.author {
            record.author_id = state.upsert_author(author);
        }

        let book = state.to_book(id, &record);
        state.books.insert(id.to_string(), record);
        Ok(book)
    }

    async fn delete(&self, id: &str) -> BookResult<()> {
        self.state.write().await.books.remove(id);
        Ok(())
    }
}
