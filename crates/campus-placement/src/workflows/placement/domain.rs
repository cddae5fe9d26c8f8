use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::storage::next_sequence_id;
use crate::workflows::error::PlacementError;

/// Identifier wrapper for company drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveId(pub String);

impl DriveId {
    pub fn generate() -> Self {
        Self(next_sequence_id("drive"))
    }
}

/// Identifier wrapper for a student's drive application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(next_sequence_id("app"))
    }
}

/// One row of a drive's calendar. Dates and times stay as entered so intake can skip bad rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleItem {
    pub stage: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
}

/// A company's recruitment campaign with its ordered hiring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    pub id: DriveId,
    pub company: String,
    pub role: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub package: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub process: Vec<String>,
    pub process_schedule: Vec<ScheduleItem>,
    pub applicants: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Admin payload for publishing a drive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDrive {
    pub company: String,
    pub role: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub package: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub process: Vec<String>,
    pub process_schedule: Vec<ScheduleItem>,
}

impl NewDrive {
    pub fn into_drive(self) -> Result<Drive, PlacementError> {
        let company = self.company.trim().to_string();
        let role = self.role.trim().to_string();
        if company.is_empty() || role.is_empty() {
            return Err(PlacementError::validation("Invalid drive data"));
        }

        let process: Vec<String> = self
            .process
            .into_iter()
            .map(|stage| stage.trim().to_string())
            .filter(|stage| !stage.is_empty())
            .collect();
        if process.is_empty() {
            return Err(PlacementError::validation(
                "No process stages defined for this drive",
            ));
        }

        Ok(Drive {
            id: DriveId::generate(),
            company,
            role,
            description: self.description,
            location: self.location,
            package: self.package,
            deadline: self.deadline,
            process,
            process_schedule: self.process_schedule,
            applicants: 0,
            is_active: true,
            created_at: Utc::now(),
        })
    }
}

/// Lifecycle of a drive application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Applied,
    StageProgress,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::StageProgress => "stage-progress",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// History entry appended on every stage transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUpdate {
    pub stage: String,
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
    pub notes: String,
}

/// A student's candidacy against one drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub drive_id: DriveId,
    pub status: ApplicationStatus,
    pub current_stage: String,
    pub process_stage_index: usize,
    pub next_step: String,
    pub applied_at: DateTime<Utc>,
    pub updates: Vec<StageUpdate>,
}
