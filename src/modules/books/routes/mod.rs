//! HTTP handlers for the books module.
//!
//! Every handler follows the same path: parse the request, dispatch to the
//! repository, encode the result. Repository errors become [`AppError`]s.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{
    error::AppError,
    extract::{JsonBody, PathParam},
};

use super::{
    models::{Book, CreateBook, UpdateBook},
    repository::BookRepositoryArc,
};

/// Routes relative to `/api`
pub fn router(repo: BookRepositoryArc) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/book/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(repo)
}

/// GET /books - List all books.
async fn list_books(State(repo): State<BookRepositoryArc>) -> Result<Json<Vec<Book>>, AppError> {
    let books = repo.list().await?;
    Ok(Json(books))
}

/// POST /books - Create a book, upserting its author.
async fn create_book(
    State(repo): State<BookRepositoryArc>,
    JsonBody(payload): JsonBody<CreateBook>,
) -> Result<Json<Book>, AppError> {
    payload.validate()?;
    let book = repo.create(payload).await?;
    tracing::info!(book_id = %book.id, "book created");
    Ok(Json(book))
}

/// GET /book/{id} - Fetch a single book.
async fn get_book(
    State(repo): State<BookRepositoryArc>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Book>, AppError> {
    let book = repo.get(&id).await?;
    Ok(Json(book))
}

/// PUT /book/{id} - Apply a partial update.
async fn update_book(
    State(repo): State<BookRepositoryArc>,
    PathParam(id): PathParam<String>,
    JsonBody(payload): JsonBody<UpdateBook>,
) -> Result<Json<Book>, AppError> {
    payload.validate()?;
    let book = repo.update(&id, payload).await?;
    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

/// DELETE /book/{id} - Remove a book; unknown ids succeed too.
async fn delete_book(
    State(repo): State<BookRepositoryArc>,
    PathParam(id): PathParam<String>,
) -> Result<StatusCode, AppError> {
    repo.delete(&id).await?;
    tracing::info!(book_id = %id, "book deleted");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::modules::books::{
        error::{BookError, BookResult},
        repository::{BookRepository, MemoryBookRepository},
    };

    fn app() -> (Router, MemoryBookRepository) {
        let repo = MemoryBookRepository::new();
        (router(Arc::new(repo.clone())), repo)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn dune() -> Value {
        json!({
            "isbn": "978-0441013593",
            "title": "Dune",
            "author": {"firstname": "Frank", "lastname": "Herbert"}
        })
    }

    async fn create(app: &Router, payload: Value) -> Value {
        let response = send(app, Method::POST, "/books", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn create_then_list_yields_one_entry() {
        let (app, _) = app();
        let created = create(&app, dune()).await;

        let response = send(&app, Method::GET, "/books", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let books = body_json(response).await;
        assert_eq!(books, json!([created]));
        assert_eq!(
            books[0]["author"],
            json!({"firstname": "Frank", "lastname": "Herbert"})
        );
    }

    #[tokio::test]
    async fn list_empty_is_empty_array() {
        let (app, _) = app();
        let response = send(&app, Method::GET, "/books", None).await;
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn same_author_creates_one_author_row() {
        let (app, repo) = app();
        create(&app, dune()).await;
        let mut messiah = dune();
        messiah["title"] = json!("Dune Messiah");
        create(&app, messiah).await;

        assert_eq!(repo.author_count().await, 1);
    }

    #[tokio::test]
    async fn post_then_get_round_trips() {
        let (app, _) = app();
        let created = create(&app, dune()).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let response = send(&app, Method::GET, &format!("/book/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let mut expected = dune();
        expected["id"] = json!(id);
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn get_unknown_is_404_with_error_body() {
        let (app, _) = app();
        let response = send(&app, Method::GET, "/book/does-not-exist", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn undecodable_id_is_400_with_error_body() {
        let (app, _) = app();
        for method in [Method::GET, Method::DELETE] {
            let response = send(&app, method, "/book/%FF", None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
            assert!(body_json(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn update_title_keeps_identifier() {
        let (app, _) = app();
        let created = create(&app, dune()).await;
        let uri = format!("/book/{}", created["id"].as_str().unwrap());

        let changes = json!({"title": "Children of Dune"});
        let response = send(&app, Method::PUT, &uri, Some(changes)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let fetched = body_json(send(&app, Method::GET, &uri, None).await).await;
        assert_eq!(fetched["id"], created["id"]);
        assert_eq!(fetched["title"], "Children of Dune");
        assert_eq!(fetched["isbn"], created["isbn"]);
        assert_eq!(fetched["author"], created["author"]);
    }

    #[tokio::test]
    async fn update_unknown_is_404() {
        let (app, _) = app();
        let changes = json!({"title": "X"});
        let response = send(&app, Method::PUT, "/book/missing", Some(changes)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_twice_is_idempotent() {
        let (app, _) = app();
        let created = create(&app, dune()).await;
        let uri = format!("/book/{}", created["id"].as_str().unwrap());

        for _ in 0..2 {
            let response = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_bytes(response).await.is_empty());
        }

        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, _) = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "Dune""#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn missing_author_is_400() {
        let (app, repo) = app();
        let response = send(
            &app,
            Method::POST,
            "/books",
            Some(json!({"isbn": "1", "title": "Dune"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_400() {
        let (app, _) = app();
        let mut payload = dune();
        payload["title"] = json!("   ");
        let response = send(&app, Method::POST, "/books", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[derive(Debug)]
    struct UnavailableRepository;

    #[async_trait]
    impl BookRepository for UnavailableRepository {
        async fn list(&self) -> BookResult<Vec<Book>> {
            Err(BookError::Storage(sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _id: &str) -> BookResult<Book> {
            Err(BookError::Storage(sqlx::Error::PoolTimedOut))
        }

        async fn create(&self, _book: CreateBook) -> BookResult<Book> {
            Err(BookError::Storage(sqlx::Error::PoolTimedOut))
        }

        async fn update(&self, _id: &str, _changes: UpdateBook) -> BookResult<Book> {
            Err(BookError::Storage(sqlx::Error::PoolTimedOut))
        }

        async fn delete(&self, _id: &str) -> BookResult<()> {
            Err(BookError::Storage(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn storage_failure_is_500_and_service_keeps_serving() {
        let app = router(Arc::new(UnavailableRepository));

        let response = send(&app, Method::GET, "/books", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());

        let response = send(&app, Method::POST, "/books", Some(dune())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
