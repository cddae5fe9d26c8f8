use crate::infra::{preview_schedule, AppState, SchedulePreview, Workflows};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use campus_placement::auth::AdminUser;
use campus_placement::error::AppError;
use campus_placement::workflows::calendar::event_router;
use campus_placement::workflows::counselling::counselling_router;
use campus_placement::workflows::payload::JsonBody;
use campus_placement::workflows::placement::{placement_router, ScheduleItem};
use campus_placement::workflows::schedule_import::ScheduleImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct SchedulePreviewRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchedulePreviewResponse {
    pub(crate) process_schedule: Vec<ScheduleItem>,
    pub(crate) preview: SchedulePreview,
}

pub(crate) fn with_workflow_routes(workflows: &Workflows) -> Router {
    placement_router(workflows.placement.clone())
        .merge(counselling_router(workflows.counselling.clone()))
        .merge(event_router(workflows.events.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/admin/schedule/preview", post(schedule_preview_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Parse a schedule sheet pasted by an admin before it goes onto a drive.
pub(crate) async fn schedule_preview_endpoint(
    _admin: AdminUser,
    Extension(state): Extension<AppState>,
    JsonBody(payload): JsonBody<SchedulePreviewRequest>,
) -> Result<Json<SchedulePreviewResponse>, AppError> {
    let process_schedule = ScheduleImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let preview = preview_schedule(&process_schedule, &state.calendar);

    Ok(Json(SchedulePreviewResponse {
        process_schedule,
        preview,
    }))
}
