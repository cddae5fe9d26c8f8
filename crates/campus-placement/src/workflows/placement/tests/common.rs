use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::auth::UserId;
use crate::config::CalendarConfig;
use crate::storage::{MemoryStore, RepositoryError};
use crate::workflows::calendar::{
    Attendee, CalendarEvent, CalendarMirror, CalendarSynchronizer, EventId, EventRepository,
    MirrorError,
};
use crate::workflows::placement::domain::{
    Application, ApplicationId, Drive, DriveId, NewDrive, ScheduleItem,
};
use crate::workflows::placement::repository::{ApplicationRepository, DriveRepository};
use crate::workflows::placement::PlacementService;

pub(super) fn student() -> UserId {
    UserId("stu-1001".to_string())
}

pub(super) fn schedule_row(stage: &str, date: Option<&str>, time: Option<&str>) -> ScheduleItem {
    ScheduleItem {
        stage: Some(stage.to_string()),
        date: date.map(str::to_string),
        time: time.map(str::to_string),
        venue: Some("Seminar Hall".to_string()),
        description: None,
    }
}

/// `OA -> Interview -> HR`, with the HR row missing its date.
pub(super) fn drive_request() -> NewDrive {
    NewDrive {
        company: "Acme Analytics".to_string(),
        role: "Graduate Engineer".to_string(),
        description: Some("Campus hiring for the 2025 batch".to_string()),
        location: Some("Pune".to_string()),
        package: Some("12 LPA".to_string()),
        deadline: None,
        process: vec!["OA".to_string(), "Interview".to_string(), "HR".to_string()],
        process_schedule: vec![
            schedule_row("OA", Some("2025-03-01"), Some("10:00 AM")),
            schedule_row("Interview", Some("2025-03-05"), Some("2:30 PM")),
            schedule_row("HR", None, None),
        ],
    }
}

pub(super) fn build_service() -> (PlacementService<MemoryStore, MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let calendar = CalendarSynchronizer::new(store.clone(), CalendarConfig::default());
    (PlacementService::new(store.clone(), calendar), store)
}

pub(super) fn service_with_events<E>(
    events: Arc<E>,
) -> (PlacementService<MemoryStore, E>, Arc<MemoryStore>)
where
    E: EventRepository + 'static,
{
    let store = Arc::new(MemoryStore::default());
    let calendar = CalendarSynchronizer::new(events, CalendarConfig::default());
    (PlacementService::new(store.clone(), calendar), store)
}

pub(super) fn published_drive(service: &PlacementService<MemoryStore, MemoryStore>) -> Drive {
    service
        .create_drive(drive_request())
        .expect("drive publishes")
}

/// Event store that accepts nothing.
pub(super) struct FailingEvents;

impl EventRepository for FailingEvents {
    fn insert_event(&self, _event: CalendarEvent) -> Result<CalendarEvent, RepositoryError> {
        Err(RepositoryError::Unavailable("calendar offline".to_string()))
    }

    fn update_event(&self, _event: CalendarEvent) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("calendar offline".to_string()))
    }

    fn events_for_application(
        &self,
        _application_id: &ApplicationId,
    ) -> Result<Vec<CalendarEvent>, RepositoryError> {
        Err(RepositoryError::Unavailable("calendar offline".to_string()))
    }

    fn events_for_attendee(&self, _user_id: &UserId) -> Result<Vec<CalendarEvent>, RepositoryError> {
        Err(RepositoryError::Unavailable("calendar offline".to_string()))
    }

    fn register_attendee(
        &self,
        _event_id: &EventId,
        _attendee: Attendee,
    ) -> Result<CalendarEvent, RepositoryError> {
        Err(RepositoryError::Unavailable("calendar offline".to_string()))
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingMirror {
    titles: Mutex<Vec<String>>,
}

impl RecordingMirror {
    pub(super) fn titles(&self) -> Vec<String> {
        self.titles.lock().expect("mirror mutex poisoned").clone()
    }
}

impl CalendarMirror for RecordingMirror {
    fn mirror(&self, event: &CalendarEvent) -> Result<Option<String>, MirrorError> {
        let mut titles = self.titles.lock().expect("mirror mutex poisoned");
        titles.push(event.title.clone());
        Ok(Some(format!("gcal-{}", titles.len())))
    }
}

#[derive(Debug)]
pub(super) struct RejectingMirror;

impl CalendarMirror for RejectingMirror {
    fn mirror(&self, _event: &CalendarEvent) -> Result<Option<String>, MirrorError> {
        Err(MirrorError::Rejected("token expired".to_string()))
    }
}

/// Drive/application store whose backend is down.
pub(super) struct UnavailableStore;

impl DriveRepository for UnavailableStore {
    fn insert_drive(&self, _drive: Drive) -> Result<Drive, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_drive(&self, _id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_drives(&self) -> Result<Vec<Drive>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn increment_applicants(&self, _id: &DriveId) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationRepository for UnavailableStore {
    fn insert_application(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_application(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_application(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_application(
        &self,
        _user_id: &UserId,
        _drive_id: &DriveId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for_drive(&self, _drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for_user(&self, _user_id: &UserId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
