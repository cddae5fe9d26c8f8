use super::domain::{Application, ApplicationId, Drive, DriveId};
use crate::auth::UserId;
use crate::storage::RepositoryError;

pub trait DriveRepository: Send + Sync {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError>;
    fn fetch_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;
    fn list_drives(&self) -> Result<Vec<Drive>, RepositoryError>;
    /// Atomic `applicants += 1`, returning the new count.
    fn increment_applicants(&self, id: &DriveId) -> Result<u32, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Conflict` when the (user, drive) pair already has an application.
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn find_application(
        &self,
        user_id: &UserId,
        drive_id: &DriveId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications_for_drive(&self, drive_id: &DriveId)
        -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_user(&self, user_id: &UserId)
        -> Result<Vec<Application>, RepositoryError>;
}
