use super::domain::{
    BookingFilter, BookingId, CounsellingApplication, CounsellingSession, SessionId,
};
use crate::auth::UserId;
use crate::storage::RepositoryError;

pub trait SessionRepository: Send + Sync {
    fn insert_session(&self, session: CounsellingSession)
        -> Result<CounsellingSession, RepositoryError>;
    fn fetch_session(&self, id: &SessionId) -> Result<Option<CounsellingSession>, RepositoryError>;
    fn list_sessions(&self) -> Result<Vec<CounsellingSession>, RepositoryError>;
}

/// Storage for counselling applications ("bookings").
pub trait BookingRepository: Send + Sync {
    /// Insert unless the user already booked the session (`Conflict`) or the seats held by
    /// applied/confirmed bookings already reach `max_participants` (`CapacityReached`).
    /// Both checks and the write happen atomically.
    fn insert_booking(
        &self,
        booking: CounsellingApplication,
        max_participants: u32,
    ) -> Result<CounsellingApplication, RepositoryError>;
    fn update_booking(&self, booking: CounsellingApplication) -> Result<(), RepositoryError>;
    fn fetch_booking(&self, id: &BookingId)
        -> Result<Option<CounsellingApplication>, RepositoryError>;
    fn find_booking(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<CounsellingApplication>, RepositoryError>;
    fn count_seated_bookings(&self, session_id: &SessionId) -> Result<u32, RepositoryError>;
    fn list_bookings(
        &self,
        filter: &BookingFilter,
    ) -> Result<Vec<CounsellingApplication>, RepositoryError>;
    fn bookings_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CounsellingApplication>, RepositoryError>;
}
