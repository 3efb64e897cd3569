//! HTTP server facade for bookshelf with Axum, error handling, and OpenAPI support.

use std::{future::Future, future::IntoFuture, time::Duration};

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::{net::TcpListener, sync::watch};

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry
///
/// Returns once `shutdown` resolves and in-flight requests have drained, or
/// the configured grace period has elapsed.
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(registry, settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    serve(listener, app, shutdown, settings.server.shutdown_grace()).await
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .mount_modules(registry)
        .with_openapi(registry)
        .with_timeout(settings.server.request_timeout())
        .with_cors()
        .with_tracing()
        .with_request_id()
        .build()
}

/// Serve `app` until `shutdown` resolves, then stop accepting connections and
/// give in-flight requests up to `grace` to finish before dropping them.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (drain_tx, mut drain_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = drain_rx.wait_for(|draining| *draining).await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.context("HTTP server failed"),
        () = shutdown => {}
    }

    tracing::info!(
        grace_ms = grace.as_millis() as u64,
        "shutdown requested, draining in-flight requests"
    );
    let _ = drain_tx.send(true);

    match tokio::time::timeout(grace, server).await {
        Ok(result) => {
            tracing::info!("HTTP server stopped");
            result.context("HTTP server failed during shutdown")
        }
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "grace period elapsed, dropping remaining connections"
            );
            Ok(())
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
