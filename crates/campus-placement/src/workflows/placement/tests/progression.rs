use chrono::Utc;

use super::common::*;
use crate::workflows::error::PlacementError;
use crate::workflows::placement::domain::{Application, ApplicationId, ApplicationStatus, DriveId};
use crate::workflows::placement::progression::{
    apply_position, reject, status_after_advance, Advancement, StageProgression,
    COMPLETION_MESSAGE, REJECTION_MESSAGE,
};

fn pipeline() -> Vec<String> {
    vec!["OA".to_string(), "Interview".to_string(), "HR".to_string()]
}

fn application_at(index: usize, status: ApplicationStatus) -> Application {
    let process = pipeline();
    Application {
        id: ApplicationId("app-progression".to_string()),
        user_id: student(),
        drive_id: DriveId("drive-progression".to_string()),
        status,
        current_stage: process[index].clone(),
        process_stage_index: index,
        next_step: StageProgression::new(&process).next_step(index),
        applied_at: Utc::now(),
        updates: Vec::new(),
    }
}

#[test]
fn next_step_names_the_following_stage() {
    let process = pipeline();
    let progression = StageProgression::new(&process);

    assert_eq!(progression.next_step(0), "Prepare for Interview");
    assert_eq!(progression.next_step(1), "Prepare for HR");
    assert_eq!(progression.next_step(2), COMPLETION_MESSAGE);
}

#[test]
fn initial_position_falls_back_for_empty_pipeline() {
    let empty: Vec<String> = Vec::new();
    let position = StageProgression::new(&empty).initial();

    assert_eq!(position.index, 0);
    assert_eq!(position.stage, "Applied");
    assert_eq!(position.next_step, COMPLETION_MESSAGE);
}

#[test]
fn advancing_walks_the_pipeline_and_selects_on_the_last_stage() {
    let process = pipeline();
    let progression = StageProgression::new(&process);
    let mut application = application_at(0, ApplicationStatus::Applied);

    for expected in 1..=2 {
        let position = match progression.advance(&application).expect("advance") {
            Advancement::Moved(position) => position,
            other => panic!("expected a move, got {other:?}"),
        };
        let status = status_after_advance(application.status, &position);
        apply_position(&mut application, &position, status, "moved", Utc::now());
        assert_eq!(application.process_stage_index, expected);
    }

    assert_eq!(application.status, ApplicationStatus::Selected);
    assert_eq!(application.current_stage, "HR");
    assert_eq!(application.next_step, COMPLETION_MESSAGE);
    assert_eq!(application.updates.len(), 2);
}

#[test]
fn intermediate_advance_leaves_status_untouched() {
    let process = pipeline();
    let position = StageProgression::new(&process).at(1).expect("valid stage");

    assert_eq!(
        status_after_advance(ApplicationStatus::Applied, &position),
        ApplicationStatus::Applied
    );
    assert_eq!(
        status_after_advance(ApplicationStatus::StageProgress, &position),
        ApplicationStatus::StageProgress
    );
}

#[test]
fn selected_final_stage_is_already_complete() {
    let process = pipeline();
    let application = application_at(2, ApplicationStatus::Selected);

    assert_eq!(
        StageProgression::new(&process).advance(&application),
        Ok(Advancement::AlreadyComplete)
    );
}

#[test]
fn last_stage_without_selection_clamps_and_selects() {
    let process = pipeline();
    let application = application_at(2, ApplicationStatus::StageProgress);

    match StageProgression::new(&process).advance(&application) {
        Ok(Advancement::Moved(position)) => {
            assert_eq!(position.index, 2);
            assert!(position.is_final);
        }
        other => panic!("expected clamped move, got {other:?}"),
    }
}

#[test]
fn rejected_applications_cannot_advance() {
    let process = pipeline();
    let application = application_at(1, ApplicationStatus::Rejected);

    match StageProgression::new(&process).advance(&application) {
        Err(PlacementError::Conflict(message)) => {
            assert_eq!(message, "Cannot advance a rejected application")
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn out_of_range_stage_is_a_validation_error() {
    let process = pipeline();
    assert!(matches!(
        StageProgression::new(&process).at(3),
        Err(PlacementError::Validation(_))
    ));
}

#[test]
fn reject_is_recorded_once() {
    let mut application = application_at(1, ApplicationStatus::StageProgress);

    assert!(reject(&mut application, Utc::now()));
    assert!(!reject(&mut application, Utc::now()));

    assert_eq!(application.status, ApplicationStatus::Rejected);
    assert_eq!(application.next_step, REJECTION_MESSAGE);
    assert_eq!(application.updates.len(), 1);
    assert_eq!(application.updates[0].stage, "Interview");
    assert_eq!(application.updates[0].notes, "Application rejected by admin");
}

#[test]
fn reject_without_stage_uses_review_label() {
    let mut application = application_at(0, ApplicationStatus::Applied);
    application.current_stage = String::new();

    reject(&mut application, Utc::now());
    assert_eq!(application.updates[0].stage, "Application Review");
}
