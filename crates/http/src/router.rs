//! Router builder for the bookshelf HTTP server

use axum::{
    error_handling::HandleErrorLayer, extract::Request, http::HeaderValue, routing::get, Router,
};
use std::time::Duration;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    BoxError, ServiceBuilder,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::Uuid;

use bookshelf_kernel::ModuleRegistry;

use crate::error::AppError;

/// Prefix under which every module router is mounted
pub const API_PREFIX: &str = "/api";

/// Builder for constructing the main HTTP router
///
/// Layers only wrap routes added before them, so add routes first.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount the merged routers of all modules under [`API_PREFIX`]
    pub fn mount_modules(mut self, registry: &ModuleRegistry) -> Self {
        let mut api = Router::new();
        for module in registry.modules() {
            tracing::info!(module = module.name(), "mounting module routes under {}", API_PREFIX);
            api = api.merge(module.routes());
        }
        self.router = self.router.nest(API_PREFIX, api);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add `x-request-id` generation and echo it back on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware; the handler future is dropped when it fires
    /// and the client gets a 408 with the standard error body
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(timeout)),
        );
        self
    }

    /// Add OpenAPI documentation by collecting specs from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = merged_openapi(registry);

        let openapi_obj: utoipa::openapi::OpenApi =
            match serde_json::from_value(openapi_spec.clone()) {
                Ok(spec) => spec,
                Err(e) => {
                    tracing::warn!(error = %e, "merged OpenAPI spec is invalid, serving a stub");
                    utoipa::openapi::OpenApiBuilder::new()
                        .info(
                            utoipa::openapi::InfoBuilder::new()
                                .title("Bookshelf API")
                                .version("1.0.0")
                                .build(),
                        )
                        .build()
                }
            };

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw merged JSON for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge every module's OpenAPI fragment into one document, prefixing paths with [`API_PREFIX`]
pub fn merged_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bookshelf API",
            "version": "1.0.0",
            "description": "Book and author CRUD API"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "string"
            }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                let prefixed_path = format!("{}{}", API_PREFIX, path);
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::timeout("request timed out")
    } else {
        AppError::Internal(anyhow::anyhow!(err))
    }
}

/// Request ID generator producing time-ordered UUIDv7 values
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::StatusCode, routing::get};
    use bookshelf_kernel::Module;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct PingModule;

    #[async_trait]
    impl Module for PingModule {
        fn name(&self) -> &'static str {
            "ping"
        }

        fn routes(&self) -> Router {
            Router::new().route("/ping", get(|| async { "pong" }))
        }

        fn openapi(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "paths": { "/ping": { "get": { "responses": {} } } },
                "components": { "schemas": { "Pong": { "type": "string" } } }
            }))
        }
    }

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(PingModule));
        registry
    }

    async fn get_status(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap) {
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), response.headers().clone())
    }

    #[tokio::test]
    async fn test_module_routes_mounted_under_api() {
        let router = RouterBuilder::new().mount_modules(&registry()).build();

        let (status, _) = get_status(router.clone(), "/api/ping").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_status(router, "/ping").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let router = RouterBuilder::new()
            .route("/health", get(|| async { "ok" }))
            .with_timeout(Duration::from_secs(5))
            .with_cors()
            .with_tracing()
            .with_request_id()
            .build();

        let (status, headers) = get_status(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_timeout_answers_with_json_error() {
        let router = RouterBuilder::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    "late"
                }),
            )
            .with_timeout(Duration::from_millis(50))
            .build();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()["content-type"], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "request timed out"}));
    }

    #[test]
    fn test_openapi_paths_are_prefixed() {
        let spec = merged_openapi(&registry());
        assert!(spec["paths"]["/api/ping"].is_object());
        assert!(spec["paths"]["/healthz"].is_object());
        assert!(spec["components"]["schemas"]["Pong"].is_object());
        assert!(spec["components"]["schemas"]["ErrorResponse"].is_object());
    }

    #[test]
    fn test_merged_openapi_parses_as_utoipa_document() {
        let spec = merged_openapi(&registry());
        let parsed: Result<utoipa::openapi::OpenApi, _> = serde_json::from_value(spec);
        assert!(parsed.is_ok());
    }
}
