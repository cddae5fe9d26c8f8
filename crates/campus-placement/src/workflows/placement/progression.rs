//! Stage arithmetic for a drive's hiring pipeline.

use chrono::{DateTime, Utc};

use super::domain::{Application, ApplicationStatus, StageUpdate};
use crate::workflows::error::PlacementError;

pub const COMPLETION_MESSAGE: &str = "Congratulations! You have completed all stages.";
pub const REJECTION_MESSAGE: &str = "Application has been rejected";
const FALLBACK_STAGE: &str = "Applied";
const FALLBACK_REVIEW_STAGE: &str = "Application Review";

/// Resolved position of an application inside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePosition {
    pub index: usize,
    pub stage: String,
    pub next_step: String,
    pub is_final: bool,
}

/// Outcome of asking the engine to move an application forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advancement {
    Moved(StagePosition),
    /// Already selected at the last stage; nothing to record.
    AlreadyComplete,
}

/// Stateless view over a drive's ordered `process`.
#[derive(Debug, Clone, Copy)]
pub struct StageProgression<'a> {
    process: &'a [String],
}

impl<'a> StageProgression<'a> {
    pub fn new(process: &'a [String]) -> Self {
        Self { process }
    }

    pub fn last_index(&self) -> Option<usize> {
        self.process.len().checked_sub(1)
    }

    /// Text shown to the student about what comes after `index`.
    pub fn next_step(&self, index: usize) -> String {
        match self.process.get(index + 1) {
            Some(stage) => format!("Prepare for {stage}"),
            None => COMPLETION_MESSAGE.to_string(),
        }
    }

    /// Position a fresh application lands on. Empty pipelines fall back to a generic stage.
    pub fn initial(&self) -> StagePosition {
        match self.process.first() {
            Some(stage) => StagePosition {
                index: 0,
                stage: stage.clone(),
                next_step: self.next_step(0),
                is_final: self.process.len() == 1,
            },
            None => StagePosition {
                index: 0,
                stage: FALLBACK_STAGE.to_string(),
                next_step: COMPLETION_MESSAGE.to_string(),
                is_final: true,
            },
        }
    }

    pub fn at(&self, index: usize) -> Result<StagePosition, PlacementError> {
        let stage = self.process.get(index).ok_or_else(|| {
            PlacementError::validation(format!(
                "Stage index {index} is outside the drive's {} stage process",
                self.process.len()
            ))
        })?;

        Ok(StagePosition {
            index,
            stage: stage.clone(),
            next_step: self.next_step(index),
            is_final: Some(index) == self.last_index(),
        })
    }

    /// `min(current + 1, last)`; the index never leaves the pipeline.
    pub fn advance(&self, application: &Application) -> Result<Advancement, PlacementError> {
        let last = self.last_index().ok_or_else(|| {
            PlacementError::validation("No process stages defined for this drive")
        })?;

        match application.status {
            ApplicationStatus::Rejected => {
                return Err(PlacementError::conflict(
                    "Cannot advance a rejected application",
                ))
            }
            ApplicationStatus::Selected if application.process_stage_index >= last => {
                return Ok(Advancement::AlreadyComplete)
            }
            _ => {}
        }

        let next_index = application
            .process_stage_index
            .saturating_add(1)
            .min(last);
        self.at(next_index).map(Advancement::Moved)
    }
}

/// Move the application onto `position`, recording the transition in its history.
pub fn apply_position(
    application: &mut Application,
    position: &StagePosition,
    status: ApplicationStatus,
    notes: impl Into<String>,
    at: DateTime<Utc>,
) {
    application.process_stage_index = position.index;
    application.current_stage = position.stage.clone();
    application.next_step = position.next_step.clone();
    application.status = status;
    application.updates.push(StageUpdate {
        stage: position.stage.clone(),
        status,
        date: at,
        notes: notes.into(),
    });
}

/// Status after an advance: `selected` on the final stage, otherwise unchanged.
pub fn status_after_advance(current: ApplicationStatus, position: &StagePosition) -> ApplicationStatus {
    if position.is_final {
        ApplicationStatus::Selected
    } else {
        current
    }
}

/// Mark the application rejected. Returns `false` when it already was.
pub fn reject(application: &mut Application, at: DateTime<Utc>) -> bool {
    if application.status == ApplicationStatus::Rejected {
        return false;
    }

    let stage = if application.current_stage.trim().is_empty() {
        FALLBACK_REVIEW_STAGE.to_string()
    } else {
        application.current_stage.clone()
    };

    application.status = ApplicationStatus::Rejected;
    application.next_step = REJECTION_MESSAGE.to_string();
    application.updates.push(StageUpdate {
        stage,
        status: ApplicationStatus::Rejected,
        date: at,
        notes: "Application rejected by admin".to_string(),
    });
    true
}
