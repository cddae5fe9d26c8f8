use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::domain::{CalendarEvent, EventId, NewEvent};
use super::repository::EventRepository;
use super::service::EventService;
use crate::auth::{AdminUser, CurrentUser};
use crate::workflows::error::PlacementError;
use crate::workflows::payload::JsonBody;

type SharedService<E> = State<Arc<EventService<E>>>;

pub fn event_router<E>(service: Arc<EventService<E>>) -> Router
where
    E: EventRepository + 'static,
{
    Router::new()
        .route("/api/events/:event_id/register", post(register_handler::<E>))
        .route("/api/admin/events", post(create_event_handler::<E>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct Registration {
    message: &'static str,
    event: CalendarEvent,
}

pub(crate) async fn register_handler<E>(
    State(service): SharedService<E>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> Result<Json<Registration>, PlacementError>
where
    E: EventRepository + 'static,
{
    let event = service.register(&user.id, &EventId(event_id))?;
    Ok(Json(Registration {
        message: "Successfully registered for event",
        event,
    }))
}

pub(crate) async fn create_event_handler<E>(
    State(service): SharedService<E>,
    _admin: AdminUser,
    JsonBody(request): JsonBody<NewEvent>,
) -> Result<(StatusCode, Json<CalendarEvent>), PlacementError>
where
    E: EventRepository + 'static,
{
    let event = service.create_event(request)?;
    Ok((StatusCode::CREATED, Json(event)))
}
