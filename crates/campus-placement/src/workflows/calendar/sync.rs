//! Best-effort synchronisation between applications and their calendar entries.
//!
//! Nothing here returns an error to the caller. Failures are logged and parked in the
//! [`SyncOutbox`] so operators can see stale calendars without the stage transition failing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CalendarEvent, EventQuery};
use super::mirror::{CalendarMirror, NoopMirror};
use super::repository::EventRepository;
use super::schedule::{compose_event, resolve_slot};
use crate::auth::UserId;
use crate::config::CalendarConfig;
use crate::storage::RepositoryError;
use crate::workflows::placement::domain::{Application, ApplicationId, Drive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Create,
    Relabel,
    Cancel,
    Mirror,
}

/// A satellite write that did not land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub application_id: ApplicationId,
    pub operation: SyncOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_index: Option<usize>,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Most recent sync failures, oldest dropped first once `capacity` is reached.
#[derive(Debug)]
pub struct SyncOutbox {
    capacity: usize,
    failures: Mutex<VecDeque<SyncFailure>>,
}

impl SyncOutbox {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, failure: SyncFailure) {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        while failures.len() >= self.capacity {
            if let Some(dropped) = failures.pop_front() {
                warn!(
                    application_id = %dropped.application_id.0,
                    operation = ?dropped.operation,
                    "sync outbox full, dropping oldest failure"
                );
            }
        }
        failures.push_back(failure);
    }

    /// Oldest first.
    pub fn failures(&self) -> Vec<SyncFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

/// Counts for one synchronisation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct CalendarSynchronizer<E> {
    events: Arc<E>,
    mirror: Arc<dyn CalendarMirror>,
    outbox: Arc<SyncOutbox>,
    defaults: CalendarConfig,
}

impl<E> CalendarSynchronizer<E>
where
    E: EventRepository + 'static,
{
    pub fn new(events: Arc<E>, defaults: CalendarConfig) -> Self {
        Self {
            events,
            mirror: Arc::new(NoopMirror),
            outbox: Arc::new(SyncOutbox::with_capacity(defaults.outbox_capacity)),
            defaults,
        }
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn CalendarMirror>) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn outbox(&self) -> Arc<SyncOutbox> {
        Arc::clone(&self.outbox)
    }

    fn record(
        &self,
        application_id: &ApplicationId,
        operation: SyncOperation,
        stage_index: Option<usize>,
        reason: String,
    ) {
        warn!(
            application_id = %application_id.0,
            ?operation,
            ?stage_index,
            %reason,
            "calendar sync failed"
        );
        self.outbox.record(SyncFailure {
            application_id: application_id.clone(),
            operation,
            stage_index,
            reason,
            recorded_at: Utc::now(),
        });
    }

    /// One event per valid `process_schedule` row. Bad rows and failed writes are skipped.
    pub fn schedule_for_application(&self, drive: &Drive, application: &Application) -> SyncReport {
        let mut report = SyncReport::default();

        if drive.process_schedule.is_empty() {
            info!(
                drive_id = %drive.id.0,
                "no process schedule for drive, skipping calendar event creation"
            );
            return report;
        }

        let now = Utc::now();
        for (stage_index, item) in drive.process_schedule.iter().enumerate() {
            let slot = match resolve_slot(item) {
                Ok(slot) => slot,
                Err(reason) => {
                    warn!(drive_id = %drive.id.0, stage_index, %reason, "skipping schedule item");
                    report.skipped += 1;
                    continue;
                }
            };

            let event = compose_event(
                drive,
                application,
                &application.user_id,
                stage_index,
                slot,
                &self.defaults,
                now,
            );

            match self.events.insert_event(event) {
                Ok(stored) => {
                    report.applied += 1;
                    self.mirror_event(&application.id, stored);
                }
                Err(err) => {
                    report.failed += 1;
                    self.record(
                        &application.id,
                        SyncOperation::Create,
                        Some(stage_index),
                        err.to_string(),
                    );
                }
            }
        }

        info!(
            application_id = %application.id.0,
            created = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            "calendar events created for application"
        );
        report
    }

    /// Push a stored event to the external calendar and keep the id it hands back.
    fn mirror_event(&self, application_id: &ApplicationId, mut event: CalendarEvent) {
        let stage_index = event.stage_index();
        let outcome = match self.mirror.mirror(&event) {
            Ok(None) => return,
            Ok(external_id) => {
                event.external_id = external_id;
                self.events.update_event(event).map_err(|err| err.to_string())
            }
            Err(err) => Err(err.to_string()),
        };

        if let Err(reason) = outcome {
            self.record(application_id, SyncOperation::Mirror, stage_index, reason);
        }
    }

    /// Mark earlier stages completed and the current stage ongoing.
    pub fn relabel_for_stage(&self, application_id: &ApplicationId, stage_index: usize) -> SyncReport {
        self.rewrite_events(application_id, SyncOperation::Relabel, |event| {
            event.relabel_for_stage(stage_index)
        })
    }

    pub fn cancel_for_application(&self, application_id: &ApplicationId) -> SyncReport {
        self.rewrite_events(application_id, SyncOperation::Cancel, CalendarEvent::cancel)
    }

    fn rewrite_events<F>(
        &self,
        application_id: &ApplicationId,
        operation: SyncOperation,
        mut rewrite: F,
    ) -> SyncReport
    where
        F: FnMut(&mut CalendarEvent) -> bool,
    {
        let mut report = SyncReport::default();

        let events = match self.events.events_for_application(application_id) {
            Ok(events) => events,
            Err(err) => {
                report.failed += 1;
                self.record(application_id, operation, None, err.to_string());
                return report;
            }
        };

        for mut event in events {
            if !rewrite(&mut event) {
                report.skipped += 1;
                continue;
            }

            let stage_index = event.stage_index();
            match self.events.update_event(event) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    report.failed += 1;
                    self.record(application_id, operation, stage_index, err.to_string());
                }
            }
        }

        report
    }

    /// Active events the user is registered for, soonest first.
    pub fn events_for_attendee(
        &self,
        user_id: &UserId,
        query: &EventQuery,
        now: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, RepositoryError> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .events_for_attendee(user_id)?
            .into_iter()
            .filter(|event| event.is_active && query.matches(event, now))
            .collect();
        events.sort_by(|left, right| left.date.cmp(&right.date));
        Ok(events)
    }
}
