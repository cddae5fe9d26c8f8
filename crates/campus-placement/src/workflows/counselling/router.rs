use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::domain::{
    BookingFilter, BookingId, BookingStatusUpdate, CounsellingApplication, CounsellingSession,
    FeedbackRequest, NewSession, SessionApplicationRequest, SessionId,
};
use super::repository::{BookingRepository, SessionRepository};
use super::service::CounsellingService;
use crate::auth::{AdminUser, CurrentUser};
use crate::workflows::error::PlacementError;
use crate::workflows::payload::JsonBody;

type SharedService<R> = State<Arc<CounsellingService<R>>>;

pub fn counselling_router<R>(service: Arc<CounsellingService<R>>) -> Router
where
    R: SessionRepository + BookingRepository + 'static,
{
    Router::new()
        .route("/api/counseling/sessions", get(list_sessions_handler::<R>))
        .route(
            "/api/counseling/sessions/:session_id/apply",
            post(apply_handler::<R>),
        )
        .route(
            "/api/counseling/my-applications",
            get(my_applications_handler::<R>),
        )
        .route(
            "/api/counseling/applications/:application_id/cancel",
            put(cancel_handler::<R>),
        )
        .route(
            "/api/counseling/applications/:application_id/feedback",
            put(feedback_handler::<R>),
        )
        .route(
            "/api/counseling/admin/sessions",
            post(create_session_handler::<R>),
        )
        .route(
            "/api/counseling/admin/applications",
            get(list_applications_handler::<R>),
        )
        .route(
            "/api/counseling/admin/applications/:application_id",
            put(update_status_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionListing {
    #[serde(default)]
    upcoming: bool,
}

pub(crate) async fn list_sessions_handler<R>(
    State(service): SharedService<R>,
    _user: CurrentUser,
    Query(query): Query<SessionListing>,
) -> Result<Json<Vec<CounsellingSession>>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    let upcoming_from = query.upcoming.then(|| Utc::now().date_naive());
    service.list_sessions(upcoming_from).map(Json)
}

pub(crate) async fn apply_handler<R>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Path(session_id): Path<String>,
    JsonBody(request): JsonBody<SessionApplicationRequest>,
) -> Result<(StatusCode, Json<CounsellingApplication>), PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    let booking = service.apply_for_session(&user.id, &SessionId(session_id), request)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub(crate) async fn my_applications_handler<R>(
    State(service): SharedService<R>,
    user: CurrentUser,
) -> Result<Json<Vec<CounsellingApplication>>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    service.applications_for_user(&user.id).map(Json)
}

pub(crate) async fn cancel_handler<R>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Path(application_id): Path<String>,
) -> Result<Json<CounsellingApplication>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    service
        .cancel_application(&user.id, &BookingId(application_id))
        .map(Json)
}

pub(crate) async fn feedback_handler<R>(
    State(service): SharedService<R>,
    user: CurrentUser,
    Path(application_id): Path<String>,
    JsonBody(request): JsonBody<FeedbackRequest>,
) -> Result<Json<CounsellingApplication>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    service
        .submit_feedback(&user.id, &BookingId(application_id), request)
        .map(Json)
}

pub(crate) async fn create_session_handler<R>(
    State(service): SharedService<R>,
    _admin: AdminUser,
    JsonBody(request): JsonBody<NewSession>,
) -> Result<(StatusCode, Json<CounsellingSession>), PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    let session = service.create_session(request)?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub(crate) async fn list_applications_handler<R>(
    State(service): SharedService<R>,
    _admin: AdminUser,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<CounsellingApplication>>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    service.list_applications(&filter).map(Json)
}

pub(crate) async fn update_status_handler<R>(
    State(service): SharedService<R>,
    _admin: AdminUser,
    Path(application_id): Path<String>,
    JsonBody(update): JsonBody<BookingStatusUpdate>,
) -> Result<Json<CounsellingApplication>, PlacementError>
where
    R: SessionRepository + BookingRepository + 'static,
{
    service
        .update_application_status(&BookingId(application_id), update)
        .map(Json)
}
