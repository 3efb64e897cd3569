pub mod error;
pub mod models;
pub mod repository;
pub mod routes;

mod openapi;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};

use repository::BookRepositoryArc;

const INIT_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS authors (
        id        BIGSERIAL PRIMARY KEY,
        firstname TEXT NOT NULL,
        lastname  TEXT NOT NULL,
        UNIQUE (firstname, lastname)
    );
    CREATE TABLE IF NOT EXISTS books (
        id        TEXT PRIMARY KEY,
        isbn      TEXT NOT NULL,
        title     TEXT NOT NULL,
        author_id BIGINT NOT NULL REFERENCES authors (id)
    );
"#;

/// Books module: CRUD over books and their authors
pub struct BooksModule {
    repo: BookRepositoryArc,
}

impl BooksModule {
    pub fn new(repo: BookRepositoryArc) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            repository = ?self.repo,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repo.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::spec())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: INIT_SCHEMA,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(repo: BookRepositoryArc) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(repo))
}
