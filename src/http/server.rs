//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one nested route set per configured version
//! - Wire up middleware (tracing, timeouts, limits, request ID, headers)
//! - Bind server to listener
//! - Record per-version request metrics

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::handlers::{health, video_routes, VersionState};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::observability::metrics;
use crate::security::{headers::security_headers, limits::limit_body_size};

/// HTTP server for the video API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let router = Self::build_router(&config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig) -> Router {
        let mut router = Router::new().route("/health", get(health));

        for version in &config.versions {
            let state = VersionState::new(version);
            let routes = video_routes(state.clone())
                .layer(middleware::from_fn_with_state(state.name, track_requests));
            router = router.nest(&version.prefix, routes);

            tracing::debug!(
                version = %version.name,
                prefix = %version.prefix,
                validation = ?version.validation,
                "Mounted video routes"
            );
        }

        let router = router.fallback(|| async { StatusCode::NOT_FOUND });
        let router = limit_body_size(router, config.security.max_body_size);
        let router = if config.security.enable_headers {
            security_headers(router)
        } else {
            router
        };

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            versions = self.config.versions.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Per-version request accounting.
async fn track_requests(
    State(version): State<Arc<str>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id_of(&request);
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    metrics::record_request(&method, status.as_u16(), &version, start_time);
    tracing::debug!(
        request_id = %request_id,
        version = %version,
        method = %method,
        path = %path,
        status = status.as_u16(),
        "Request handled"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersionConfig;
    use crate::videos::ValidationMode;
    use axum::body::to_bytes;
    use axum::http::{header, Method};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        HttpServer::new(ServiceConfig::default()).router()
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_video() -> Value {
        json!({ "title": "Rust in Action", "author": "Tim", "availableResolutions": ["P720"] })
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let app = router();

        let response = send(&app, Method::POST, "/hometask_01/api/videos", Some(valid_video())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["canBeDownloaded"], true);
        assert!(created["minAgeRestriction"].is_null());
        assert_eq!(created["createdAt"], created["publicationDate"]);

        let response = send(&app, Method::GET, "/hometask_01/api/videos/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);

        let response = send(&app, Method::GET, "/hometask_01/api/videos", None).await;
        assert_eq!(json_body(response).await, json!([created]));
    }

    #[tokio::test]
    async fn test_versions_have_separate_stores() {
        let app = router();
        send(&app, Method::POST, "/hometask_01/api/videos", Some(valid_video())).await;

        let response = send(&app, Method::GET, "/hometask_02/api/videos", None).await;
        assert_eq!(json_body(response).await, json!([]));

        let response = send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;
        assert_eq!(json_body(response).await["id"], 1);
    }

    #[tokio::test]
    async fn test_missing_and_non_numeric_ids() {
        let app = router();
        for uri in ["/hometask_01/api/videos/9", "/hometask_01/api/videos/abc"] {
            assert_eq!(send(&app, Method::GET, uri, None).await.status(), StatusCode::NOT_FOUND);
            assert_eq!(send(&app, Method::DELETE, uri, None).await.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                send(&app, Method::PUT, uri, Some(valid_video())).await.status(),
                StatusCode::NOT_FOUND
            );
        }
    }

    #[tokio::test]
    async fn test_put_checks_existence_before_body() {
        let app = router();
        let response = send(&app, Method::PUT, "/hometask_03/api/videos/1", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_basic_validation_error() {
        let app = router();
        let response =
            send(&app, Method::POST, "/hometask_01/api/videos", Some(json!({ "title": "x" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "errorsMessages": [{
                "message": "Invalid input",
                "field": "title/author/availableResolutions"
            }] })
        );
    }

    #[tokio::test]
    async fn test_strict_validation_errors_per_field() {
        let app = router();
        let body = json!({ "title": "x".repeat(41), "author": "", "availableResolutions": ["P9"] });
        let response = send(&app, Method::POST, "/hometask_03/api/videos", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        let fields: Vec<&str> = body["errorsMessages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["title", "author", "availableResolutions"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = router();
        send(&app, Method::POST, "/hometask_03/api/videos", Some(valid_video())).await;

        let update = json!({
            "title": "Updated",
            "author": "Ann",
            "availableResolutions": ["P1080", "P2160"],
            "canBeDownloaded": false,
            "minAgeRestriction": 12,
            "publicationDate": "2030-01-01T00:00:00.000Z"
        });
        let response = send(&app, Method::PUT, "/hometask_03/api/videos/1", Some(update)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let video = json_body(send(&app, Method::GET, "/hometask_03/api/videos/1", None).await).await;
        assert_eq!(video["title"], "Updated");
        assert_eq!(video["canBeDownloaded"], false);
        assert_eq!(video["minAgeRestriction"], 12);
        assert_eq!(video["publicationDate"], "2030-01-01T00:00:00.000Z");

        let response = send(&app, Method::DELETE, "/hometask_03/api/videos/1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, Method::GET, "/hometask_03/api/videos/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_clears_and_restarts_ids() {
        let app = router();
        send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;
        send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;

        let response = send(&app, Method::DELETE, "/hometask_02/api/testing/all-data", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, Method::GET, "/hometask_02/api/videos", None).await;
        assert_eq!(json_body(response).await, json!([]));

        let response = send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;
        assert_eq!(json_body(response).await["id"], 1);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let app = router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/hometask_02/api/videos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errorsMessages"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = ServiceConfig::default();
        config.security.max_body_size = 64;
        let app = HttpServer::new(config).router();

        let body = json!({ "title": "x".repeat(200), "author": "a", "availableResolutions": [] });
        let response = send(&app, Method::POST, "/hometask_01/api/videos", Some(body)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_request_id_and_security_headers() {
        let app = router();
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_custom_prefix_and_unknown_route() {
        let mut config = ServiceConfig::default();
        config.versions = vec![VersionConfig::new("only", "/api", ValidationMode::Typed)];
        let app = HttpServer::new(config).router();

        let response = send(&app, Method::GET, "/api/videos", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, Method::GET, "/hometask_01/api/videos", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_not_found() {
        let app = router();
        send(&app, Method::POST, "/hometask_01/api/videos", Some(valid_video())).await;

        let cases = [
            (Method::PATCH, "/hometask_01/api/videos/1"),
            (Method::POST, "/hometask_01/api/testing/all-data"),
            (Method::PUT, "/hometask_01/api/videos"),
        ];
        for (method, uri) in cases {
            let response = send(&app, method.clone(), uri, Some(valid_video())).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_typed_update_errors_per_field() {
        let app = router();
        send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;

        let update = json!({
            "title": "ok",
            "author": 42,
            "availableResolutions": ["P720"],
            "canBeDownloaded": "no",
            "minAgeRestriction": 30
        });
        let response = send(&app, Method::PUT, "/hometask_02/api/videos/1", Some(update)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        let fields: Vec<&str> = body["errorsMessages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["author", "canBeDownloaded", "minAgeRestriction"]);

        let video = json_body(send(&app, Method::GET, "/hometask_02/api/videos/1", None).await).await;
        assert_eq!(video["author"], "Tim");
    }

    #[tokio::test]
    async fn test_malformed_json_body_on_update() {
        let app = router();
        send(&app, Method::POST, "/hometask_02/api/videos", Some(valid_video())).await;

        let request = Request::builder()
            .method(Method::PUT)
            .uri("/hometask_02/api/videos/1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errorsMessages"][0]["field"], "body");

        let video = json_body(send(&app, Method::GET, "/hometask_02/api/videos/1", None).await).await;
        assert_eq!(video["title"], "Rust in Action");
    }
}
