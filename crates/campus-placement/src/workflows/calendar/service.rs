use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Attendee, AttendeeStatus, CalendarEvent, EventId, NewEvent};
use super::repository::EventRepository;
use crate::auth::UserId;
use crate::config::CalendarConfig;
use crate::storage::RepositoryError;
use crate::workflows::error::PlacementError;

/// General campus events that students sign up for directly.
pub struct EventService<E> {
    events: Arc<E>,
    defaults: CalendarConfig,
}

impl<E> EventService<E>
where
    E: EventRepository + 'static,
{
    pub fn new(events: Arc<E>, defaults: CalendarConfig) -> Self {
        Self { events, defaults }
    }

    pub fn create_event(&self, request: NewEvent) -> Result<CalendarEvent, PlacementError> {
        let event = request.into_event(&self.defaults)?;
        let stored = self.events.insert_event(event)?;
        info!(
            event_id = %stored.id.0,
            kind = %stored.kind,
            seats = ?stored.max_attendees,
            "event published"
        );
        Ok(stored)
    }

    pub fn register(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<CalendarEvent, PlacementError> {
        let attendee = Attendee {
            user_id: user_id.clone(),
            status: AttendeeStatus::Registered,
            registered_at: Utc::now(),
        };

        match self.events.register_attendee(event_id, attendee) {
            Ok(event) => {
                info!(
                    event_id = %event.id.0,
                    attendees = event.attendees.len(),
                    "student registered for event"
                );
                Ok(event)
            }
            Err(RepositoryError::NotFound) => Err(PlacementError::not_found("Event not found")),
            Err(RepositoryError::Conflict) => Err(PlacementError::conflict(
                "Already registered for this event",
            )),
            Err(RepositoryError::CapacityReached) => {
                Err(PlacementError::CapacityExceeded("Event is full".to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }
}
