use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::domain::{
    BookingFilter, BookingId, BookingStatus, BookingStatusUpdate, CounsellingApplication,
    CounsellingSession, Feedback, FeedbackRequest, NewSession, SessionApplicationRequest,
    SessionId,
};
use super::repository::{BookingRepository, SessionRepository};
use crate::auth::UserId;
use crate::storage::RepositoryError;
use crate::workflows::error::PlacementError;

const SESSION_FULL: &str = "Session is full";
const ALREADY_APPLIED: &str = "You have already applied for this session";

/// Counselling sessions and the capacity-limited bookings against them.
pub struct CounsellingService<R> {
    repository: Arc<R>,
}

impl<R> CounsellingService<R>
where
    R: SessionRepository + BookingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create_session(&self, request: NewSession) -> Result<CounsellingSession, PlacementError> {
        let session = request.into_session()?;
        let stored = self.repository.insert_session(session)?;
        info!(
            session_id = %stored.id.0,
            counsellor = %stored.counsellor_name,
            seats = stored.max_participants,
            "counselling session opened"
        );
        Ok(stored)
    }

    /// Active sessions by date. `upcoming_from` keeps only scheduled sessions on or after it.
    pub fn list_sessions(
        &self,
        upcoming_from: Option<NaiveDate>,
    ) -> Result<Vec<CounsellingSession>, PlacementError> {
        let mut sessions: Vec<CounsellingSession> = self
            .repository
            .list_sessions()?
            .into_iter()
            .filter(|session| session.is_active)
            .filter(|session| match upcoming_from {
                Some(today) => session.accepts_applications() && session.date >= today,
                None => true,
            })
            .collect();
        sessions.sort_by(|left, right| (left.date, &left.time).cmp(&(right.date, &right.time)));
        Ok(sessions)
    }

    pub fn get_session(&self, session_id: &SessionId) -> Result<CounsellingSession, PlacementError> {
        self.repository
            .fetch_session(session_id)?
            .ok_or_else(|| PlacementError::not_found("Session not found"))
    }

    pub fn apply_for_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
        request: SessionApplicationRequest,
    ) -> Result<CounsellingApplication, PlacementError> {
        let session = self.get_session(session_id)?;
        if !session.accepts_applications() {
            return Err(PlacementError::validation(
                "Session is not available for applications",
            ));
        }

        let reason = request.reason.trim().to_string();
        if reason.is_empty() {
            return Err(PlacementError::validation(
                "Please tell us why you would like counselling",
            ));
        }

        if self.repository.find_booking(user_id, session_id)?.is_some() {
            return Err(PlacementError::conflict(ALREADY_APPLIED));
        }
        if self.repository.count_seated_bookings(session_id)? >= session.max_participants {
            return Err(PlacementError::CapacityExceeded(SESSION_FULL.to_string()));
        }

        let now = Utc::now();
        let mut booking = CounsellingApplication {
            id: BookingId::generate(),
            user_id: user_id.clone(),
            session_id: session.id.clone(),
            status: BookingStatus::Applied,
            applied_at: now,
            reason,
            urgency: request.urgency.unwrap_or_default(),
            previous_counselling: request.previous_counselling.unwrap_or(false),
            notes: request.notes,
            counsellor_notes: None,
            feedback: None,
            updates: Vec::new(),
        };
        booking.push_update("Application submitted", "student", now);

        let stored = match self
            .repository
            .insert_booking(booking, session.max_participants)
        {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(PlacementError::conflict(ALREADY_APPLIED)),
            Err(RepositoryError::CapacityReached) => {
                return Err(PlacementError::CapacityExceeded(SESSION_FULL.to_string()))
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            booking_id = %stored.id.0,
            session_id = %session.id.0,
            urgency = ?stored.urgency,
            "counselling application received"
        );
        Ok(stored)
    }

    fn owned_booking(
        &self,
        user_id: &UserId,
        booking_id: &BookingId,
    ) -> Result<Option<CounsellingApplication>, PlacementError> {
        Ok(self
            .repository
            .fetch_booking(booking_id)?
            .filter(|booking| &booking.user_id == user_id))
    }

    /// Student cancellation. Frees the seat for someone else.
    pub fn cancel_application(
        &self,
        user_id: &UserId,
        booking_id: &BookingId,
    ) -> Result<CounsellingApplication, PlacementError> {
        let mut booking = self
            .owned_booking(user_id, booking_id)?
            .ok_or_else(|| PlacementError::not_found("Application not found"))?;

        if booking.status.is_terminal() {
            return Err(PlacementError::validation("Cannot cancel this application"));
        }

        booking.status = BookingStatus::Cancelled;
        booking.push_update("Cancelled by student", "student", Utc::now());
        self.repository.update_booking(booking.clone())?;
        info!(booking_id = %booking.id.0, "counselling application cancelled");
        Ok(booking)
    }

    pub fn submit_feedback(
        &self,
        user_id: &UserId,
        booking_id: &BookingId,
        request: FeedbackRequest,
    ) -> Result<CounsellingApplication, PlacementError> {
        let mut booking = self
            .owned_booking(user_id, booking_id)?
            .filter(|booking| booking.status == BookingStatus::Completed)
            .ok_or_else(|| PlacementError::not_found("Completed application not found"))?;

        if !(1..=5).contains(&request.rating) {
            return Err(PlacementError::validation("Rating must be between 1 and 5"));
        }

        booking.feedback = Some(Feedback {
            rating: request.rating,
            comments: request.comments,
            submitted_at: Utc::now(),
        });
        self.repository.update_booking(booking.clone())?;
        Ok(booking)
    }

    pub fn applications_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CounsellingApplication>, PlacementError> {
        let mut bookings = self.repository.bookings_for_user(user_id)?;
        bookings.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(bookings)
    }

    pub fn list_applications(
        &self,
        filter: &BookingFilter,
    ) -> Result<Vec<CounsellingApplication>, PlacementError> {
        let mut bookings = self.repository.list_bookings(filter)?;
        bookings.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(bookings)
    }

    /// Admin status change; every call leaves a history entry.
    pub fn update_application_status(
        &self,
        booking_id: &BookingId,
        update: BookingStatusUpdate,
    ) -> Result<CounsellingApplication, PlacementError> {
        let mut booking = self
            .repository
            .fetch_booking(booking_id)?
            .ok_or_else(|| PlacementError::not_found("Application not found"))?;

        if let Some(status) = update.status {
            booking.status = status;
        }
        let notes = match update.counsellor_notes {
            Some(notes) => {
                booking.counsellor_notes = Some(notes.clone());
                notes
            }
            None => format!("Status updated to {}", booking.status.label()),
        };
        booking.push_update(notes, "admin", Utc::now());
        self.repository.update_booking(booking.clone())?;
        info!(
            booking_id = %booking.id.0,
            status = booking.status.label(),
            "counselling application updated"
        );
        Ok(booking)
    }
}
