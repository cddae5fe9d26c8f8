use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::RepositoryError;
use crate::auth::UserId;
use crate::workflows::calendar::{Attendee, CalendarEvent, EventId, EventRepository};
use crate::workflows::counselling::domain::{
    BookingFilter, BookingId, CounsellingApplication, CounsellingSession, SessionId,
};
use crate::workflows::counselling::repository::{BookingRepository, SessionRepository};
use crate::workflows::placement::domain::{Application, ApplicationId, Drive, DriveId};
use crate::workflows::placement::repository::{ApplicationRepository, DriveRepository};

/// Mutex-guarded collections standing in for the document database.
///
/// Each collection is locked as a whole, so the uniqueness, counter, and capacity rules below
/// hold under concurrent requests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    drives: Arc<Mutex<BTreeMap<DriveId, Drive>>>,
    applications: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
    events: Arc<Mutex<BTreeMap<EventId, CalendarEvent>>>,
    sessions: Arc<Mutex<BTreeMap<SessionId, CounsellingSession>>>,
    bookings: Arc<Mutex<BTreeMap<BookingId, CounsellingApplication>>>,
}

fn lock<T>(collection: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    collection
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

impl DriveRepository for MemoryStore {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        let mut guard = lock(&self.drives)?;
        if guard.contains_key(&drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        Ok(lock(&self.drives)?.get(id).cloned())
    }

    fn list_drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        Ok(lock(&self.drives)?.values().cloned().collect())
    }

    fn increment_applicants(&self, id: &DriveId) -> Result<u32, RepositoryError> {
        let mut guard = lock(&self.drives)?;
        let drive = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        drive.applicants = drive.applicants.saturating_add(1);
        Ok(drive.applicants)
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.applications)?;
        let duplicate = guard.values().any(|existing| {
            existing.user_id == application.user_id && existing.drive_id == application.drive_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.applications)?;
        match guard.get_mut(&application.id) {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.applications)?.get(id).cloned())
    }

    fn find_application(
        &self,
        user_id: &UserId,
        drive_id: &DriveId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.applications)?
            .values()
            .find(|application| {
                &application.user_id == user_id && &application.drive_id == drive_id
            })
            .cloned())
    }

    fn applications_for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.applications)?
            .values()
            .filter(|application| &application.drive_id == drive_id)
            .cloned()
            .collect())
    }

    fn applications_for_user(&self, user_id: &UserId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.applications)?
            .values()
            .filter(|application| &application.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl EventRepository for MemoryStore {
    fn insert_event(&self, event: CalendarEvent) -> Result<CalendarEvent, RepositoryError> {
        let mut guard = lock(&self.events)?;
        if guard.contains_key(&event.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    fn update_event(&self, event: CalendarEvent) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.events)?;
        match guard.get_mut(&event.id) {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn events_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<CalendarEvent>, RepositoryError> {
        Ok(lock(&self.events)?
            .values()
            .filter(|event| {
                event
                    .link
                    .as_ref()
                    .is_some_and(|link| &link.application_id == application_id)
            })
            .cloned()
            .collect())
    }

    fn events_for_attendee(&self, user_id: &UserId) -> Result<Vec<CalendarEvent>, RepositoryError> {
        Ok(lock(&self.events)?
            .values()
            .filter(|event| event.has_attendee(user_id))
            .cloned()
            .collect())
    }

    fn register_attendee(
        &self,
        event_id: &EventId,
        attendee: Attendee,
    ) -> Result<CalendarEvent, RepositoryError> {
        let mut guard = lock(&self.events)?;
        let event = guard
            .get_mut(event_id)
            .filter(|event| event.is_active)
            .ok_or(RepositoryError::NotFound)?;
        if event.has_attendee(&attendee.user_id) {
            return Err(RepositoryError::Conflict);
        }
        if event.is_full() {
            return Err(RepositoryError::CapacityReached);
        }
        event.attendees.push(attendee);
        Ok(event.clone())
    }
}

impl SessionRepository for MemoryStore {
    fn insert_session(
        &self,
        session: CounsellingSession,
    ) -> Result<CounsellingSession, RepositoryError> {
        let mut guard = lock(&self.sessions)?;
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<CounsellingSession>, RepositoryError> {
        Ok(lock(&self.sessions)?.get(id).cloned())
    }

    fn list_sessions(&self) -> Result<Vec<CounsellingSession>, RepositoryError> {
        Ok(lock(&self.sessions)?.values().cloned().collect())
    }
}

impl BookingRepository for MemoryStore {
    fn insert_booking(
        &self,
        booking: CounsellingApplication,
        max_participants: u32,
    ) -> Result<CounsellingApplication, RepositoryError> {
        let mut guard = lock(&self.bookings)?;
        let mut seated = 0usize;
        for existing in guard
            .values()
            .filter(|existing| existing.session_id == booking.session_id)
        {
            if existing.user_id == booking.user_id {
                return Err(RepositoryError::Conflict);
            }
            if existing.status.holds_seat() {
                seated += 1;
            }
        }
        if seated >= max_participants as usize {
            return Err(RepositoryError::CapacityReached);
        }

        guard.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn update_booking(&self, booking: CounsellingApplication) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.bookings)?;
        match guard.get_mut(&booking.id) {
            Some(slot) => {
                *slot = booking;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_booking(
        &self,
        id: &BookingId,
    ) -> Result<Option<CounsellingApplication>, RepositoryError> {
        Ok(lock(&self.bookings)?.get(id).cloned())
    }

    fn find_booking(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<CounsellingApplication>, RepositoryError> {
        Ok(lock(&self.bookings)?
            .values()
            .find(|booking| &booking.user_id == user_id && &booking.session_id == session_id)
            .cloned())
    }

    fn count_seated_bookings(&self, session_id: &SessionId) -> Result<u32, RepositoryError> {
        let seated = lock(&self.bookings)?
            .values()
            .filter(|booking| &booking.session_id == session_id && booking.status.holds_seat())
            .count();
        Ok(u32::try_from(seated).unwrap_or(u32::MAX))
    }

    fn list_bookings(
        &self,
        filter: &BookingFilter,
    ) -> Result<Vec<CounsellingApplication>, RepositoryError> {
        Ok(lock(&self.bookings)?
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect())
    }

    fn bookings_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CounsellingApplication>, RepositoryError> {
        Ok(lock(&self.bookings)?
            .values()
            .filter(|booking| &booking.user_id == user_id)
            .cloned()
            .collect())
    }
}
