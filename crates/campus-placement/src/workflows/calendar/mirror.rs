use std::fmt::Debug;

use super::domain::CalendarEvent;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("calendar provider unavailable: {0}")]
    Unavailable(String),
    #[error("calendar provider rejected event: {0}")]
    Rejected(String),
}

/// Optional external calendar (e.g. a student's connected Google calendar).
///
/// Mirroring is best-effort; the returned id, when present, is stored on the local event.
pub trait CalendarMirror: Debug + Send + Sync {
    fn mirror(&self, event: &CalendarEvent) -> Result<Option<String>, MirrorError>;
}

/// Mirror used when no external provider is connected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMirror;

impl CalendarMirror for NoopMirror {
    fn mirror(&self, _event: &CalendarEvent) -> Result<Option<String>, MirrorError> {
        Ok(None)
    }
}
