use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::storage::next_sequence_id;
use crate::workflows::error::PlacementError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(next_sequence_id("session"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn generate() -> Self {
        Self(next_sequence_id("booking"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Individual,
    Group,
}

/// A counsellor's bookable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounsellingSession {
    pub id: SessionId,
    pub counsellor_name: String,
    pub topic: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: u32,
    pub location: String,
    pub description: Option<String>,
    pub max_participants: u32,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl CounsellingSession {
    pub fn accepts_applications(&self) -> bool {
        self.is_active && self.status == SessionStatus::Scheduled
    }
}

/// Admin payload for opening a session. Omitted fields take the clinic defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub counsellor_name: String,
    pub topic: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub session_type: Option<SessionType>,
}

impl NewSession {
    pub const DEFAULT_DURATION_MINUTES: u32 = 60;
    pub const DEFAULT_LOCATION: &'static str = "Counselling Room";

    pub fn into_session(self) -> Result<CounsellingSession, PlacementError> {
        let counsellor_name = self.counsellor_name.trim().to_string();
        if counsellor_name.is_empty() {
            return Err(PlacementError::validation("Please add a counsellor name"));
        }
        let topic = self.topic.trim().to_string();
        if topic.is_empty() {
            return Err(PlacementError::validation("Please add a session topic"));
        }
        let time = self.time.trim().to_string();
        if time.is_empty() {
            return Err(PlacementError::validation("Please add a session time"));
        }
        let max_participants = self.max_participants.unwrap_or(1);
        if max_participants == 0 {
            return Err(PlacementError::validation(
                "A session needs room for at least one participant",
            ));
        }

        Ok(CounsellingSession {
            id: SessionId::generate(),
            counsellor_name,
            topic,
            date: self.date,
            time,
            duration_minutes: self
                .duration_minutes
                .unwrap_or(Self::DEFAULT_DURATION_MINUTES),
            location: self
                .location
                .filter(|location| !location.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_LOCATION.to_string()),
            description: self.description,
            max_participants,
            session_type: self.session_type.unwrap_or_default(),
            status: SessionStatus::Scheduled,
            is_active: true,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Applied,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Applied => "applied",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no-show",
        }
    }

    /// Bookings in these states hold a seat in the session.
    pub const fn holds_seat(self) -> bool {
        matches!(self, BookingStatus::Applied | BookingStatus::Confirmed)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: u8,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub status: BookingStatus,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub updated_by: String,
}

/// A student's request for a seat in a counselling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounsellingApplication {
    pub id: BookingId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub status: BookingStatus,
    pub applied_at: DateTime<Utc>,
    pub reason: String,
    pub urgency: Urgency,
    pub previous_counselling: bool,
    pub notes: Option<String>,
    pub counsellor_notes: Option<String>,
    pub feedback: Option<Feedback>,
    pub updates: Vec<BookingUpdate>,
}

impl CounsellingApplication {
    pub fn push_update(
        &mut self,
        notes: impl Into<String>,
        updated_by: impl Into<String>,
        at: DateTime<Utc>,
    ) {
        self.updates.push(BookingUpdate {
            status: self.status,
            date: at,
            notes: notes.into(),
            updated_by: updated_by.into(),
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionApplicationRequest {
    pub reason: String,
    pub urgency: Option<Urgency>,
    pub previous_counselling: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Admin-side status change for a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingStatusUpdate {
    pub status: Option<BookingStatus>,
    pub counsellor_notes: Option<String>,
}

/// Optional filters for the admin booking listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingFilter {
    pub session_id: Option<SessionId>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &CounsellingApplication) -> bool {
        self.session_id
            .as_ref()
            .map_or(true, |session_id| &booking.session_id == session_id)
            && self.status.map_or(true, |status| booking.status == status)
    }
}
