//! Video CRUD handlers.
//!
//! One copy of these routes is mounted per configured version; each copy
//! carries its own validation mode and store in [`VersionState`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::VersionConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::videos::{validate_create, validate_update, ValidationMode, Video, VideoStore};

/// State shared by the handlers of one version.
#[derive(Clone)]
pub struct VersionState {
    pub name: Arc<str>,
    pub mode: ValidationMode,
    pub store: VideoStore,
}

impl VersionState {
    pub fn new(config: &VersionConfig) -> Self {
        Self {
            name: Arc::from(config.name.as_str()),
            mode: config.validation,
            store: VideoStore::new(),
        }
    }

    fn publish_count(&self) {
        metrics::record_video_count(&self.name, self.store.len());
    }
}

/// Routes of one version, relative to its prefix.
pub fn video_routes(state: VersionState) -> Router {
    Router::new()
        .route("/testing/all-data", delete(reset_all))
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
        // Known paths with an unsupported method are unknown routes too.
        .method_not_allowed_fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}

/// Ids that are not integers can never match a stored video.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn reset_all(State(state): State<VersionState>) -> StatusCode {
    state.store.clear();
    state.publish_count();
    tracing::info!(version = %state.name, "All videos removed");
    StatusCode::NO_CONTENT
}

async fn list_videos(State(state): State<VersionState>) -> Json<Vec<Video>> {
    Json(state.store.list())
}

async fn get_video(
    State(state): State<VersionState>,
    Path(id): Path<String>,
) -> Result<Json<Video>, ApiError> {
    let id = parse_id(&id)?;
    state.store.get(id).map(Json).ok_or(ApiError::NotFound)
}

async fn create_video(
    State(state): State<VersionState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let Json(body) = body?;
    let new_video = validate_create(state.mode, &body)?;
    let video = state.store.insert(new_video);
    state.publish_count();

    tracing::debug!(version = %state.name, id = video.id, "Video created");
    Ok((StatusCode::CREATED, Json(video)))
}

async fn update_video(
    State(state): State<VersionState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.store.get(id).is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(body) = body?;
    let update = validate_update(state.mode, &body)?;
    if !state.store.update(id, update) {
        return Err(ApiError::NotFound);
    }

    tracing::debug!(version = %state.name, id, "Video updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_video(
    State(state): State<VersionState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.remove(id) {
        return Err(ApiError::NotFound);
    }
    state.publish_count();

    tracing::debug!(version = %state.name, id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
