//! Calendar entries mirroring each application's stage schedule, plus general campus events.

pub mod domain;
pub mod mirror;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod sync;

pub use domain::{
    Attendee, AttendeeStatus, CalendarEvent, EventId, EventLink, EventQuery, EventStatus,
    NewEvent, CANCELLED_MARKER, COMPLETED_MARKER, CURRENT_MARKER, PLACEMENT_EVENT_KIND,
};
pub use mirror::{CalendarMirror, MirrorError, NoopMirror};
pub use repository::EventRepository;
pub use router::event_router;
pub use schedule::{parse_clock, parse_schedule_date, resolve_slot, EventSlot, SkipReason};
pub use service::EventService;
pub use sync::{CalendarSynchronizer, SyncFailure, SyncOperation, SyncOutbox, SyncReport};
