//! HTTP request handlers for the Gavel API
//!
//! Implements handlers for document submission, place listing,
//! index building, cache access, and background tasks.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use base64::Engine;
use dashmap::DashMap;

use crate::core::error::GavelError;
use crate::core::extract::{self, DocumentFormat};
use crate::core::services::Services;
use crate::core::tasks::STATUS_NOT_FOUND;
use crate::core::types::*;

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Document submission handler
///
/// Decodes the uploaded file, extracts and normalizes its text,
/// persists the text to the uploads container, and runs the
/// summarization client over it. The structured reply is cached
/// under the blob key with the default TTL.
///
/// # Errors
///
/// - `InvalidRequest`: empty filename or malformed base64
/// - `Extraction`: unsupported extension or unreadable content
/// - `Upstream`: summarization endpoint failure
pub async fn submit_document_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<SubmitDocumentRequest>,
) -> Result<Json<SubmitDocumentResponse>, GavelError> {
    if req.filename.trim().is_empty() {
        return Err(GavelError::InvalidRequest(
            "Filename cannot be empty".to_string(),
        ));
    }

    let format = DocumentFormat::from_filename(&req.filename)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.content_base64)
        .map_err(|e| GavelError::InvalidRequest(format!("Invalid base64 content: {e}")))?;

    let text = extract::extract(&bytes, format)?;

    // Persist the extracted text under a fresh upload key
    let container = &services.config.storage.upload_container;
    let key = format!("{}/{}.txt", uuid::Uuid::new_v4(), req.filename);
    services.store.ensure_container(container).await?;
    services.store.write_text(container, &key, &text).await?;

    tracing::info!(filename = %req.filename, blob = %key, "Document persisted");

    let summary = services.llm.summarize_minutes(&text).await?;

    services.cache.set(
        &key,
        summary.response.clone(),
        services.config.cache.default_ttl_secs,
    );

    Ok(Json(SubmitDocumentResponse {
        usage: summary.usage,
        key,
        response: summary.response,
    }))
}

/// Place listing handler
///
/// Lookup failures are reported in-band with `success: false`
/// rather than an error status.
pub async fn places_handler(State(services): State<Arc<Services>>) -> Json<PlacesResponse> {
    match services.places.list_places().await {
        Ok(places) => Json(PlacesResponse {
            success: true,
            places: Some(places),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Place listing failed");
            Json(PlacesResponse {
                success: false,
                places: None,
            })
        }
    }
}

/// Single-group index build handler
pub async fn build_group_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<BuildGroupRequest>,
) -> Result<Json<BuildGroupResponse>, GavelError> {
    for (name, value) in [
        ("place", &req.place),
        ("department", &req.department),
        ("date", &req.date),
    ] {
        if value.trim().is_empty() {
            return Err(GavelError::InvalidRequest(format!(
                "{name} cannot be empty"
            )));
        }
    }

    let statuses = DashMap::new();
    let index = services
        .builder
        .build(&req.place, &req.department, &req.date, &statuses)
        .await?;

    let id = group_id(&req.place, &req.department, &req.date);
    let status = statuses
        .get(&id)
        .map(|entry| entry.value().clone())
        .unwrap_or(GroupStatus::Pending);

    Ok(Json(BuildGroupResponse {
        group_id: id,
        token_count: index.token_count,
        status,
    }))
}

/// Whole-place batch index build handler
///
/// Returns one terminal status per `(place, department, date)`
/// group, keyed by group id. Individual group failures appear as
/// `failed` entries, as does a department whose listing failed;
/// only the place metadata lookup produces an error status.
pub async fn build_place_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<BuildPlaceRequest>,
) -> Result<Json<HashMap<String, GroupStatus>>, GavelError> {
    if req.place_name.trim().is_empty() {
        return Err(GavelError::InvalidRequest(
            "place_name cannot be empty".to_string(),
        ));
    }

    let statuses = services.orchestrator.build_all(&req.place_name).await?;
    Ok(Json(statuses))
}

/// Cache read handler
///
/// Expired or absent keys report `value: null` with a 200.
pub async fn cache_read_handler(
    State(services): State<Arc<Services>>,
    Path(key): Path<String>,
) -> Json<CacheReadResponse> {
    let value = services.cache.get(&key);
    Json(CacheReadResponse { key, value })
}

/// Cache write handler
///
/// Applies the configured default TTL when the request omits one,
/// then spawns a best-effort sweep of expired entries.
pub async fn cache_write_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<CacheWriteRequest>,
) -> Result<Json<CacheReadResponse>, GavelError> {
    if req.key.trim().is_empty() {
        return Err(GavelError::InvalidRequest(
            "Cache key cannot be empty".to_string(),
        ));
    }

    let ttl = req
        .ttl_seconds
        .unwrap_or(services.config.cache.default_ttl_secs);
    services.cache.set(&req.key, req.value.clone(), ttl);

    // Reads enforce expiry themselves; the sweep only bounds growth.
    let cache = Arc::clone(&services.cache);
    tokio::spawn(async move {
        cache.clear_expired();
    });

    Ok(Json(CacheReadResponse {
        key: req.key,
        value: Some(req.value),
    }))
}

/// Task scheduling handler
///
/// Schedules a background write of `content` into the uploads
/// container and returns the task id without waiting for it.
pub async fn schedule_task_handler(
    State(services): State<Arc<Services>>,
    Json(req): Json<ScheduleTaskRequest>,
) -> Result<Json<ScheduleTaskResponse>, GavelError> {
    if req.filename.trim().is_empty() {
        return Err(GavelError::InvalidRequest(
            "Filename cannot be empty".to_string(),
        ));
    }

    let store = Arc::clone(&services.store);
    let container = services.config.storage.upload_container.clone();
    let task_id = services.tasks.schedule(async move {
        store.ensure_container(&container).await?;
        store.write_text(&container, &req.filename, &req.content).await?;
        Ok(format!("Wrote {container}/{}", req.filename))
    });

    Ok(Json(ScheduleTaskResponse { task_id }))
}

/// Task polling handler
///
/// Unknown and evicted ids answer with the `"Task not found"`
/// sentinel rather than a 404.
pub async fn task_status_handler(
    State(services): State<Arc<Services>>,
    Path(task_id): Path<String>,
) -> Json<TaskStatusResponse> {
    let status = services
        .tasks
        .status(&task_id)
        .unwrap_or_else(|| STATUS_NOT_FOUND.to_string());
    Json(TaskStatusResponse { task_id, status })
}
