use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};

use super::{new_book_id, BookRepository};
use crate::modules::books::{
    error::{BookError, BookResult},
    models::{Author, Book, CreateBook, UpdateBook},
};

const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.isbn, b.title, a.firstname, a.lastname
    FROM books AS b
    INNER JOIN authors AS a ON b.author_id = a.id
"#;

const SELECT_BOOK_BY_ID: &str = r#"
    SELECT b.id, b.isbn, b.title, a.firstname, a.lastname
    FROM books AS b
    INNER JOIN authors AS a ON b.author_id = a.id
    WHERE b.id = $1
"#;

// Returns the id of the new or existing author row
const UPSERT_AUTHOR: &str = r#"
    INSERT INTO authors (firstname, lastname)
    VALUES ($1, $2)
    ON CONFLICT (firstname, lastname) DO UPDATE SET firstname = EXCLUDED.firstname
    RETURNING id
"#;

/// Joined `books`/`authors` row.
#[derive(Debug, FromRow)]
struct BookRow {
    id: String,
    isbn: String,
    title: String,
    firstname: String,
    lastname: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            isbn: row.isbn,
            title: row.title,
            author: Author {
                firstname: row.firstname,
                lastname: row.lastname,
            },
        }
    }
}

/// Stored columns of a book, before the author join.
#[derive(Debug, FromRow)]
struct StoredBook {
    isbn: String,
    title: String,
    author_id: i64,
}

/// PostgreSQL implementation of the book repository.
#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn upsert_author(conn: &mut PgConnection, author: &Author) -> sqlx::Result<i64> {
    sqlx::query_scalar(UPSERT_AUTHOR)
        .bind(&author.firstname)
        .bind(&author.lastname)
        .fetch_one(conn)
        .await
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn list(&self) -> BookResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(SELECT_BOOKS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get(&self, id: &str) -> BookResult<Book> {
        sqlx::query_as::<_, BookRow>(SELECT_BOOK_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Book::from)
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    async fn create(&self, book: CreateBook) -> BookResult<Book> {
        let mut tx = self.pool.begin().await?;

        let author_id = upsert_author(&mut *tx, &book.author).await?;
        let id = new_book_id();

        sqlx::query("INSERT INTO books (id, isbn, title, author_id) VALUES ($1, $2, $3, $4)")
            .bind(&id)
            .bind(&book.isbn)
            .bind(&book.title)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(book_id = %id, author_id, "book created");
        Ok(Book {
            id,
            isbn: book.isbn,
            title: book.title,
            author: book.author,
        })
    }

    async fn update(&self, id: &str, changes: UpdateBook) -> BookResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, StoredBook>(
            "SELECT isbn, title, author_id FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        let author_id = match &changes.author {
            Some(author) => upsert_author(&mut *tx, author).await?,
            None => current.author_id,
        };
        let isbn = changes.isbn.unwrap_or(current.isbn);
        let title = changes.title.unwrap_or(current.title);

        sqlx::query("UPDATE books SET isbn = $1, title = $2, author_id = $3 WHERE id = $4")
            .bind(&isbn)
            .bind(&title)
            .bind(author_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let book = sqlx::query_as::<_, BookRow>(SELECT_BOOK_BY_ID)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(book_id = %id, author_id, "book updated");
        Ok(book.into())
    }

    async fn delete(&self, id: &str) -> BookResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(book_id = %id, rows = result.rows_affected(), "book deleted");
        Ok(())
    }
}
