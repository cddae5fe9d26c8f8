use super::domain::{Attendee, CalendarEvent, EventId};
use crate::auth::UserId;
use crate::storage::RepositoryError;
use crate::workflows::placement::domain::ApplicationId;

/// Storage abstraction for calendar events.
pub trait EventRepository: Send + Sync {
    fn insert_event(&self, event: CalendarEvent) -> Result<CalendarEvent, RepositoryError>;
    fn update_event(&self, event: CalendarEvent) -> Result<(), RepositoryError>;
    fn events_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<CalendarEvent>, RepositoryError>;
    fn events_for_attendee(&self, user_id: &UserId) -> Result<Vec<CalendarEvent>, RepositoryError>;
    /// Append `attendee` to an active event in one step.
    ///
    /// `NotFound` for a missing or inactive event, `Conflict` when the user is already listed,
    /// `CapacityReached` once `max_attendees` is hit.
    fn register_attendee(
        &self,
        event_id: &EventId,
        attendee: Attendee,
    ) -> Result<CalendarEvent, RepositoryError>;
}
