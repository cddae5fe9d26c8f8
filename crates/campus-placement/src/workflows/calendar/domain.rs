use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::config::CalendarConfig;
use crate::storage::next_sequence_id;
use crate::workflows::error::PlacementError;
use crate::workflows::placement::domain::{ApplicationId, DriveId};

pub const PLACEMENT_EVENT_KIND: &str = "Placement Drive";
pub const COMPLETED_MARKER: &str = "[COMPLETED]";
pub const CURRENT_MARKER: &str = "[CURRENT]";
pub const CANCELLED_MARKER: &str = "[CANCELLED]";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn generate() -> Self {
        Self(next_sequence_id("evt"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

/// Typed back-reference from a generated event to the application stage it mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLink {
    pub application_id: ApplicationId,
    pub drive_id: DriveId,
    pub stage_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    Registered,
    Attended,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub user_id: UserId,
    pub status: AttendeeStatus,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub kind: String,
    pub date: NaiveDateTime,
    pub time: String,
    pub location: String,
    pub description: String,
    pub organizer: String,
    pub attendees: Vec<Attendee>,
    pub status: EventStatus,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    /// Present on events generated from a drive schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<EventLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl CalendarEvent {
    pub fn has_attendee(&self, user_id: &UserId) -> bool {
        self.attendees
            .iter()
            .any(|attendee| &attendee.user_id == user_id)
    }

    pub fn stage_index(&self) -> Option<usize> {
        self.link.as_ref().map(|link| link.stage_index)
    }

    pub fn is_full(&self) -> bool {
        self.max_attendees
            .is_some_and(|max| self.attendees.len() >= max as usize)
    }

    /// Bring the event in line with the application's current stage index.
    /// Returns `true` when anything changed.
    pub fn relabel_for_stage(&mut self, current_index: usize) -> bool {
        use std::cmp::Ordering;

        let Some(stage_index) = self.stage_index() else {
            return false;
        };
        if self.status == EventStatus::Cancelled {
            return false;
        }

        let (status, marker) = match stage_index.cmp(&current_index) {
            Ordering::Less => (EventStatus::Completed, COMPLETED_MARKER),
            Ordering::Equal => (EventStatus::Ongoing, CURRENT_MARKER),
            Ordering::Greater => return false,
        };

        let title = with_stage_marker(&self.title, marker);
        let changed = self.status != status || self.title != title;
        self.status = status;
        self.title = title;
        changed
    }

    /// Returns `false` if the event was already cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.title.starts_with(CANCELLED_MARKER) {
            return false;
        }

        self.title = format!("{CANCELLED_MARKER} {}", self.title);
        self.description = format!("{CANCELLED_MARKER} {}", self.description);
        self.status = EventStatus::Cancelled;
        true
    }
}

/// Admin request for a general event students can register for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_attendees: Option<u32>,
}

impl NewEvent {
    pub fn into_event(self, defaults: &CalendarConfig) -> Result<CalendarEvent, PlacementError> {
        let title = self.title.trim();
        let kind = self.kind.trim();
        if title.is_empty() || kind.is_empty() {
            return Err(PlacementError::validation("Title, type and date are required"));
        }
        if self.max_attendees == Some(0) {
            return Err(PlacementError::validation("maxAttendees must be at least 1"));
        }

        let time = self
            .time
            .map(|time| time.trim().to_string())
            .filter(|time| !time.is_empty())
            .unwrap_or_else(|| self.date.format("%-I:%M %p").to_string());
        let location = self
            .location
            .map(|location| location.trim().to_string())
            .filter(|location| !location.is_empty())
            .unwrap_or_else(|| defaults.default_venue.clone());

        Ok(CalendarEvent {
            id: EventId::generate(),
            title: title.to_string(),
            kind: kind.to_string(),
            date: self.date,
            time,
            location,
            description: self.description.unwrap_or_default(),
            organizer: defaults.organizer.clone(),
            attendees: Vec::new(),
            status: EventStatus::Scheduled,
            is_active: true,
            max_attendees: self.max_attendees,
            link: None,
            external_id: None,
        })
    }
}

/// `?upcoming=&type=` narrowing for a student's event list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl EventQuery {
    pub fn matches(&self, event: &CalendarEvent, now: NaiveDateTime) -> bool {
        let kind = self
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty());
        if kind.is_some_and(|kind| event.kind != kind) {
            return false;
        }
        !self.upcoming || (event.status == EventStatus::Scheduled && event.date >= now)
    }
}

/// Swap whichever stage marker the title carries for `marker`.
fn with_stage_marker(title: &str, marker: &str) -> String {
    if title.starts_with(marker) {
        return title.to_string();
    }

    let base = [COMPLETED_MARKER, CURRENT_MARKER]
        .into_iter()
        .find_map(|existing| title.strip_prefix(existing))
        .map(str::trim_start)
        .unwrap_or(title);
    format!("{marker} {base}")
}
