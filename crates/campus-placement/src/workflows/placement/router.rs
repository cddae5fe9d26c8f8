use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{Application, ApplicationId, Drive, DriveId, NewDrive};
use super::repository::{ApplicationRepository, DriveRepository};
use super::service::PlacementService;
use crate::auth::{AdminUser, CurrentUser};
use crate::workflows::calendar::{CalendarEvent, EventQuery, EventRepository, SyncFailure};
use crate::workflows::error::PlacementError;
use crate::workflows::payload::JsonBody;

type SharedService<R, E> = State<Arc<PlacementService<R, E>>>;

/// Router builder exposing drive intake and the admin stage controls.
pub fn placement_router<R, E>(service: Arc<PlacementService<R, E>>) -> Router
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    Router::new()
        .route("/api/drives", get(list_drives_handler::<R, E>))
        .route("/api/drives/:drive_id", get(drive_handler::<R, E>))
        .route("/api/drives/:drive_id/apply", post(apply_handler::<R, E>))
        .route("/api/applications/mine", get(my_applications_handler::<R, E>))
        .route("/api/events/mine", get(my_events_handler::<R, E>))
        .route("/api/admin/drives", post(create_drive_handler::<R, E>))
        .route(
            "/api/admin/drives/:drive_id/applications",
            get(drive_applications_handler::<R, E>),
        )
        .route(
            "/api/admin/applications/:application_id/next-stage",
            put(next_stage_handler::<R, E>),
        )
        .route(
            "/api/admin/applications/:application_id/reject",
            put(reject_handler::<R, E>),
        )
        .route(
            "/api/admin/applications/:application_id/stage",
            put(set_stage_handler::<R, E>),
        )
        .route(
            "/api/admin/calendar/sync-failures",
            get(sync_failures_handler::<R, E>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DriveSearch {
    #[serde(default)]
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StageOverride {
    process_stage_index: usize,
}

pub(crate) async fn list_drives_handler<R, E>(
    State(service): SharedService<R, E>,
    Query(query): Query<DriveSearch>,
) -> Result<Json<Vec<Drive>>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.list_drives(query.search.as_deref()).map(Json)
}

pub(crate) async fn drive_handler<R, E>(
    State(service): SharedService<R, E>,
    Path(drive_id): Path<String>,
) -> Result<Json<Drive>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.get_drive(&DriveId(drive_id)).map(Json)
}

pub(crate) async fn apply_handler<R, E>(
    State(service): SharedService<R, E>,
    user: CurrentUser,
    Path(drive_id): Path<String>,
) -> Result<(StatusCode, Json<Application>), PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    let application = service.apply_to_drive(&user.id, &DriveId(drive_id))?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn my_applications_handler<R, E>(
    State(service): SharedService<R, E>,
    user: CurrentUser,
) -> Result<Json<Vec<Application>>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.applications_for_user(&user.id).map(Json)
}

pub(crate) async fn my_events_handler<R, E>(
    State(service): SharedService<R, E>,
    user: CurrentUser,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<CalendarEvent>>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.events_for_user(&user.id, &query).map(Json)
}

pub(crate) async fn create_drive_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
    JsonBody(request): JsonBody<NewDrive>,
) -> Result<(StatusCode, Json<Drive>), PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    let drive = service.create_drive(request)?;
    Ok((StatusCode::CREATED, Json(drive)))
}

pub(crate) async fn drive_applications_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
    Path(drive_id): Path<String>,
) -> Result<Json<Vec<Application>>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.applications_for_drive(&DriveId(drive_id)).map(Json)
}

pub(crate) async fn next_stage_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
    Path(application_id): Path<String>,
) -> Result<Json<Application>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service.advance_stage(&ApplicationId(application_id)).map(Json)
}

pub(crate) async fn reject_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
    Path(application_id): Path<String>,
) -> Result<Json<Application>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service
        .reject_application(&ApplicationId(application_id))
        .map(Json)
}

pub(crate) async fn set_stage_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
    Path(application_id): Path<String>,
    JsonBody(request): JsonBody<StageOverride>,
) -> Result<Json<Application>, PlacementError>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    service
        .set_stage(&ApplicationId(application_id), request.process_stage_index)
        .map(Json)
}

pub(crate) async fn sync_failures_handler<R, E>(
    State(service): SharedService<R, E>,
    _admin: AdminUser,
) -> Json<Vec<SyncFailure>>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    Json(service.sync_failures())
}
