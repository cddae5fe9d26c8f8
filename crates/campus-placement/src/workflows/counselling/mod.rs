//! Counselling sessions and capacity-limited student bookings.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BookingFilter, BookingId, BookingStatus, BookingStatusUpdate, CounsellingApplication,
    CounsellingSession, Feedback, FeedbackRequest, NewSession, SessionApplicationRequest,
    SessionId, SessionStatus, SessionType, Urgency,
};
pub use repository::{BookingRepository, SessionRepository};
pub use router::counselling_router;
pub use service::CounsellingService;
