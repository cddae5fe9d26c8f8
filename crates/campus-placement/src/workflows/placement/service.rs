use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::domain::{Application, ApplicationId, ApplicationStatus, Drive, DriveId, NewDrive};
use super::progression::{
    apply_position, reject, status_after_advance, Advancement, StageProgression,
};
use super::repository::{ApplicationRepository, DriveRepository};
use crate::auth::UserId;
use crate::storage::RepositoryError;
use crate::workflows::calendar::{
    CalendarEvent, CalendarSynchronizer, EventQuery, EventRepository, SyncFailure,
};
use crate::workflows::error::PlacementError;

const ALREADY_APPLIED: &str = "Already applied for this drive";

/// Drive intake and the stage progression engine, with calendar side effects.
pub struct PlacementService<R, E> {
    repository: Arc<R>,
    calendar: CalendarSynchronizer<E>,
}

impl<R, E> PlacementService<R, E>
where
    R: DriveRepository + ApplicationRepository + 'static,
    E: EventRepository + 'static,
{
    pub fn new(repository: Arc<R>, calendar: CalendarSynchronizer<E>) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    pub fn create_drive(&self, request: NewDrive) -> Result<Drive, PlacementError> {
        let drive = request.into_drive()?;
        let stored = self.repository.insert_drive(drive)?;
        info!(drive_id = %stored.id.0, company = %stored.company, "drive published");
        Ok(stored)
    }

    pub fn get_drive(&self, drive_id: &DriveId) -> Result<Drive, PlacementError> {
        self.repository
            .fetch_drive(drive_id)?
            .ok_or_else(|| PlacementError::not_found("Company drive not found"))
    }

    /// Active drives, optionally filtered by a case-insensitive company/role match.
    pub fn list_drives(&self, search: Option<&str>) -> Result<Vec<Drive>, PlacementError> {
        let needle = search
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        let mut drives: Vec<Drive> = self
            .repository
            .list_drives()?
            .into_iter()
            .filter(|drive| drive.is_active)
            .filter(|drive| match &needle {
                Some(needle) => {
                    drive.company.to_lowercase().contains(needle)
                        || drive.role.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();
        drives.sort_by(|left, right| {
            (left.deadline.is_none(), left.deadline).cmp(&(right.deadline.is_none(), right.deadline))
        });
        Ok(drives)
    }

    /// Start a student's candidacy at stage 0 and lay out their calendar.
    pub fn apply_to_drive(
        &self,
        user_id: &UserId,
        drive_id: &DriveId,
    ) -> Result<Application, PlacementError> {
        let drive = self
            .repository
            .fetch_drive(drive_id)?
            .filter(|drive| drive.is_active)
            .ok_or_else(|| PlacementError::not_found("Company drive not found"))?;

        if self.repository.find_application(user_id, drive_id)?.is_some() {
            return Err(PlacementError::conflict(ALREADY_APPLIED));
        }

        let position = StageProgression::new(&drive.process).initial();
        let application = Application {
            id: ApplicationId::generate(),
            user_id: user_id.clone(),
            drive_id: drive.id.clone(),
            status: ApplicationStatus::Applied,
            current_stage: position.stage,
            process_stage_index: position.index,
            next_step: position.next_step,
            applied_at: Utc::now(),
            updates: Vec::new(),
        };

        let application = match self.repository.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(PlacementError::conflict(ALREADY_APPLIED)),
            Err(other) => return Err(other.into()),
        };

        self.calendar.schedule_for_application(&drive, &application);

        match self.repository.increment_applicants(&drive.id) {
            Ok(applicants) => info!(
                application_id = %application.id.0,
                drive_id = %drive.id.0,
                applicants,
                "application received"
            ),
            Err(err) => error!(
                drive_id = %drive.id.0,
                error = %err,
                "failed to bump applicant counter"
            ),
        }

        Ok(application)
    }

    fn load_with_drive(
        &self,
        application_id: &ApplicationId,
    ) -> Result<(Application, Drive), PlacementError> {
        let application = self.get_application(application_id)?;
        let drive = self
            .repository
            .fetch_drive(&application.drive_id)?
            .ok_or_else(|| PlacementError::not_found("Drive not found for this application"))?;
        Ok((application, drive))
    }

    /// Move the application one stage forward, clamped at the final stage.
    pub fn advance_stage(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementError> {
        let (mut application, drive) = self.load_with_drive(application_id)?;

        let position = match StageProgression::new(&drive.process).advance(&application)? {
            Advancement::Moved(position) => position,
            Advancement::AlreadyComplete => {
                info!(application_id = %application.id.0, "application already at final stage");
                return Ok(application);
            }
        };

        let status = status_after_advance(application.status, &position);
        apply_position(
            &mut application,
            &position,
            status,
            "Moved to next stage by admin",
            Utc::now(),
        );
        self.repository.update_application(application.clone())?;
        info!(
            application_id = %application.id.0,
            stage = %application.current_stage,
            status = application.status.label(),
            "application advanced"
        );

        self.calendar
            .relabel_for_stage(&application.id, application.process_stage_index);
        Ok(application)
    }

    pub fn reject_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementError> {
        let mut application = self.get_application(application_id)?;

        if !reject(&mut application, Utc::now()) {
            info!(application_id = %application.id.0, "application already rejected");
            return Ok(application);
        }

        self.repository.update_application(application.clone())?;
        info!(application_id = %application.id.0, "application rejected");

        self.calendar.cancel_for_application(&application.id);
        Ok(application)
    }

    /// Manual override placing the application on an explicit stage.
    pub fn set_stage(
        &self,
        application_id: &ApplicationId,
        stage_index: usize,
    ) -> Result<Application, PlacementError> {
        let (mut application, drive) = self.load_with_drive(application_id)?;
        if application.status == ApplicationStatus::Rejected {
            return Err(PlacementError::conflict(
                "Cannot change the stage of a rejected application",
            ));
        }
        let position = StageProgression::new(&drive.process).at(stage_index)?;

        let status = if position.is_final {
            ApplicationStatus::Selected
        } else {
            ApplicationStatus::StageProgress
        };
        apply_position(
            &mut application,
            &position,
            status,
            format!("Updated by admin to stage {stage_index}"),
            Utc::now(),
        );
        self.repository.update_application(application.clone())?;

        self.calendar.relabel_for_stage(&application.id, stage_index);
        Ok(application)
    }

    pub fn get_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementError> {
        self.repository
            .fetch_application(application_id)?
            .ok_or_else(|| PlacementError::not_found("Application not found"))
    }

    /// Newest applications first.
    pub fn applications_for_drive(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<Application>, PlacementError> {
        let mut applications = self.repository.applications_for_drive(drive_id)?;
        applications.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(applications)
    }

    pub fn applications_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, PlacementError> {
        let mut applications = self.repository.applications_for_user(user_id)?;
        applications.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(applications)
    }

    pub fn events_for_user(
        &self,
        user_id: &UserId,
        query: &EventQuery,
    ) -> Result<Vec<CalendarEvent>, PlacementError> {
        Ok(self
            .calendar
            .events_for_attendee(user_id, query, Utc::now().naive_utc())?)
    }

    pub fn sync_failures(&self) -> Vec<SyncFailure> {
        self.calendar.outbox().failures()
    }
}
