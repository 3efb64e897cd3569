mod duration;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use bookshelf_app::books::repository::{
    BookRepositoryArc, MemoryBookRepository, PostgresBookRepository,
};
use bookshelf_kernel::{
    settings::{Settings, StorageBackend},
    InitCtx, ModuleRegistry,
};
use clap::Parser;

/// Book and author CRUD service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// How long in-flight requests may finish after a shutdown signal, e.g. 15s or 1m
    #[arg(long = "graceful-timeout", value_parser = duration::parse_duration)]
    graceful_timeout: Option<Duration>,

    /// Override the configured storage backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Backend {
    Postgres,
    Memory,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(grace) = self.graceful_timeout {
            settings.server.shutdown_grace_ms = grace.as_millis() as u64;
        }
        if let Some(backend) = self.backend {
            settings.database.backend = match backend {
                Backend::Postgres => StorageBackend::Postgres,
                Backend::Memory => StorageBackend::Memory,
            };
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    cli.apply(&mut settings);

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        grace_ms = settings.server.shutdown_grace_ms,
        "bookshelf bootstrap starting"
    );

    let (repo, pool) = match settings.database.backend {
        StorageBackend::Postgres => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            let repo: BookRepositoryArc = Arc::new(PostgresBookRepository::new(pool.clone()));
            (repo, Some(pool))
        }
        StorageBackend::Memory => {
            let repo: BookRepositoryArc = Arc::new(MemoryBookRepository::new());
            (repo, None)
        }
    };

    let mut registry = ModuleRegistry::new();
    bookshelf_app::register_all(&mut registry, repo);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;

    match &pool {
        Some(pool) => {
            let applied = bookshelf_db::run_migrations(pool, &registry.collect_migrations())
                .await
                .context("failed to run migrations")?;
            tracing::info!(applied, "migrations complete");
        }
        None => tracing::info!("memory backend selected, skipping migrations"),
    }

    registry.start_modules(&ctx).await?;
    tracing::info!("bookshelf bootstrap complete");

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("shutting down");
    served
}
