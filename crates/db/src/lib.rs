//! PostgreSQL connection pool and migration runner for bookshelf modules.

use anyhow::Context;
use bookshelf_kernel::{settings::DatabaseSettings, Migration};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Connection options built from settings.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
}

/// Open a connection pool and verify connectivity.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    tracing::info!(
        target: "bookshelf-db",
        db = %settings.target(),
        max_connections = settings.max_connections,
        "connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(connect_options(settings))
        .await
        .with_context(|| format!("failed to connect to database {}", settings.target()))
}

/// Apply pending migrations, each in its own transaction.
///
/// Applied migrations are recorded in `schema_migrations` and skipped on later runs.
/// Returns the number of migrations applied.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::raw_sql(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create schema_migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let mut tx = pool.begin().await.context("failed to begin migration")?;

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2)",
        )
        .bind(module)
        .bind(migration.id)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to check migration {}/{}", module, migration.id))?;

        if already_applied {
            tracing::debug!(
                target: "bookshelf-db",
                module = %module,
                migration = migration.id,
                "migration already applied"
            );
            continue;
        }

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(
            target: "bookshelf-db",
            module = %module,
            migration = migration.id,
            "migration applied"
        );
        applied += 1;
    }

    Ok(applied)
}
