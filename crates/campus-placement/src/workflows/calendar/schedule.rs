//! Turning a drive's `process_schedule` rows into calendar slots.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use tracing::debug;

use super::domain::{
    Attendee, AttendeeStatus, CalendarEvent, EventId, EventLink, EventStatus,
    PLACEMENT_EVENT_KIND,
};
use crate::auth::UserId;
use crate::config::CalendarConfig;
use crate::workflows::placement::domain::{Application, Drive, ScheduleItem};

pub const DEFAULT_TIME_LABEL: &str = "10:00 AM";
const DEFAULT_DETAILS: &str = "Please check with placement cell for more details.";

/// Why a schedule row could not become an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("schedule item is missing a stage")]
    MissingStage,
    #[error("schedule item is missing a date")]
    MissingDate,
    #[error("schedule item has an unparsable date '{0}'")]
    InvalidDate(String),
}

/// A schedule row with its date and clock resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSlot {
    pub stage: String,
    pub starts_at: NaiveDateTime,
    pub time_label: String,
    pub venue: Option<String>,
    pub details: Option<String>,
}

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(AM|PM)$").expect("clock pattern compiles")
    })
}

/// Parse `H:MM AM|PM` into a 24-hour clock. Anything else yields `None`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let captures = clock_pattern().captures(raw.trim())?;
    let hours: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = captures.get(2)?.as_str().parse().ok()?;
    let afternoon = captures.get(3)?.as_str().eq_ignore_ascii_case("pm");

    let hour24 = match (hours, afternoon) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, true) => hour + 12,
        (hour, false) => hour,
    };

    NaiveTime::from_hms_opt(hour24, minutes, 0)
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM[:SS]` values.
pub fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|timestamp| timestamp.date())
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|inner| inner.trim()).filter(|inner| !inner.is_empty())
}

/// Validate a schedule row and resolve when it happens.
pub fn resolve_slot(item: &ScheduleItem) -> Result<EventSlot, SkipReason> {
    let stage = non_blank(item.stage.as_ref()).ok_or(SkipReason::MissingStage)?;
    let raw_date = non_blank(item.date.as_ref()).ok_or(SkipReason::MissingDate)?;
    let date =
        parse_schedule_date(raw_date).ok_or_else(|| SkipReason::InvalidDate(raw_date.to_string()))?;

    let time_label = non_blank(item.time.as_ref())
        .unwrap_or(DEFAULT_TIME_LABEL)
        .to_string();
    let clock = parse_clock(&time_label).unwrap_or_else(|| {
        debug!(time = %time_label, "unrecognised schedule time, defaulting to 10:00");
        default_clock()
    });

    Ok(EventSlot {
        stage: stage.to_string(),
        starts_at: date.and_time(clock),
        time_label,
        venue: non_blank(item.venue.as_ref()).map(str::to_string),
        details: non_blank(item.description.as_ref()).map(str::to_string),
    })
}

fn default_clock() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Build the calendar entry for one schedule row of a fresh application.
pub fn compose_event(
    drive: &Drive,
    application: &Application,
    attendee: &UserId,
    stage_index: usize,
    slot: EventSlot,
    defaults: &CalendarConfig,
    now: DateTime<Utc>,
) -> CalendarEvent {
    let details = slot.details.as_deref().unwrap_or(DEFAULT_DETAILS);

    CalendarEvent {
        id: EventId::generate(),
        title: format!("{} - {}", drive.company, slot.stage),
        kind: PLACEMENT_EVENT_KIND.to_string(),
        date: slot.starts_at,
        time: slot.time_label,
        location: slot
            .venue
            .unwrap_or_else(|| defaults.default_venue.clone()),
        description: format!(
            "{} for {} position at {}. {}",
            slot.stage, drive.role, drive.company, details
        ),
        organizer: defaults.organizer.clone(),
        attendees: vec![Attendee {
            user_id: attendee.clone(),
            status: AttendeeStatus::Registered,
            registered_at: now,
        }],
        status: EventStatus::Scheduled,
        is_active: true,
        max_attendees: None,
        link: Some(EventLink {
            application_id: application.id.clone(),
            drive_id: drive.id.clone(),
            stage_index,
        }),
        external_id: None,
    }
}
