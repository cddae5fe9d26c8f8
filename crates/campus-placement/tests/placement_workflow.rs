use std::sync::Arc;

use campus_placement::auth::UserId;
use campus_placement::config::CalendarConfig;
use campus_placement::storage::MemoryStore;
use campus_placement::workflows::calendar::{CalendarSynchronizer, EventQuery, EventStatus};
use campus_placement::workflows::counselling::{
    BookingStatus, CounsellingService, NewSession, SessionApplicationRequest,
};
use campus_placement::workflows::error::PlacementError;
use campus_placement::workflows::placement::{ApplicationStatus, NewDrive, PlacementService};
use campus_placement::workflows::schedule_import::ScheduleImporter;
use chrono::NaiveDate;

const SCHEDULE_CSV: &str = "Stage,Date,Time,Venue,Description\n\
OA,2025-02-10,9:00 AM,Computer Lab 2,Aptitude and coding round\n\
Interview,2025-02-14,11:30 AM,Placement Office,\n\
HR,2025-02-20,4:00 PM,,Final discussion\n";

fn placement_service(store: Arc<MemoryStore>) -> PlacementService<MemoryStore, MemoryStore> {
    let calendar = CalendarSynchronizer::new(store.clone(), CalendarConfig::default());
    PlacementService::new(store, calendar)
}

#[test]
fn imported_schedule_drives_the_oa_interview_hr_example() {
    let store = Arc::new(MemoryStore::default());
    let service = placement_service(store);
    let schedule = ScheduleImporter::from_reader(SCHEDULE_CSV.as_bytes()).expect("schedule parses");

    let drive = service
        .create_drive(NewDrive {
            company: "Northwind".to_string(),
            role: "Associate Consultant".to_string(),
            process: vec!["OA".to_string(), "Interview".to_string(), "HR".to_string()],
            process_schedule: schedule,
            ..NewDrive::default()
        })
        .expect("drive publishes");

    let student = UserId("stu-2025-017".to_string());
    let application = service
        .apply_to_drive(&student, &drive.id)
        .expect("application accepted");
    assert_eq!(application.current_stage, "OA");
    assert_eq!(application.next_step, "Prepare for Interview");

    let events = service.events_for_user(&student, &EventQuery::default()).expect("events listed");
    assert_eq!(events.len(), 3);
    let hr = &events[2];
    assert_eq!(hr.location, "TBD");
    assert_eq!(
        hr.date,
        NaiveDate::from_ymd_opt(2025, 2, 20)
            .and_then(|date| date.and_hms_opt(16, 0, 0))
            .expect("valid datetime")
    );

    service.advance_stage(&application.id).expect("interview");
    let selected = service.advance_stage(&application.id).expect("hr");
    assert_eq!(selected.status, ApplicationStatus::Selected);
    assert_eq!(selected.process_stage_index, 2);
    assert_eq!(
        selected.next_step,
        "Congratulations! You have completed all stages."
    );

    let events = service.events_for_user(&student, &EventQuery::default()).expect("events listed");
    assert_eq!(events[0].status, EventStatus::Completed);
    assert_eq!(events[1].status, EventStatus::Completed);
    assert_eq!(events[2].status, EventStatus::Ongoing);
    assert!(events[2].title.starts_with("[CURRENT]"));
}

#[test]
fn rejected_candidates_keep_their_stage_and_lose_their_calendar() {
    let store = Arc::new(MemoryStore::default());
    let service = placement_service(store);
    let schedule = ScheduleImporter::from_reader(SCHEDULE_CSV.as_bytes()).expect("schedule parses");
    let drive = service
        .create_drive(NewDrive {
            company: "Northwind".to_string(),
            role: "Associate Consultant".to_string(),
            process: vec!["OA".to_string(), "Interview".to_string(), "HR".to_string()],
            process_schedule: schedule,
            ..NewDrive::default()
        })
        .expect("drive publishes");

    let student = UserId("stu-2025-018".to_string());
    let application = service
        .apply_to_drive(&student, &drive.id)
        .expect("application accepted");
    service.advance_stage(&application.id).expect("interview");
    let rejected = service
        .reject_application(&application.id)
        .expect("rejected");

    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    assert_eq!(rejected.current_stage, "Interview");
    assert!(service
        .events_for_user(&student, &EventQuery::default())
        .expect("events listed")
        .iter()
        .all(|event| event.status == EventStatus::Cancelled));
    assert!(matches!(
        service.advance_stage(&application.id),
        Err(PlacementError::Conflict(_))
    ));
    assert!(matches!(
        service.set_stage(&application.id, 2),
        Err(PlacementError::Conflict(_))
    ));
}

#[test]
fn counselling_and_placement_share_one_store() {
    let store = Arc::new(MemoryStore::default());
    let counselling = CounsellingService::new(store.clone());
    let placement = placement_service(store);

    let session = counselling
        .create_session(NewSession {
            counsellor_name: "Ms. Fernandes".to_string(),
            topic: "Choosing between offers".to_string(),
            date: NaiveDate::from_ymd_opt(2099, 6, 1).expect("valid date"),
            time: "2:00 PM".to_string(),
            duration_minutes: Some(45),
            location: None,
            description: None,
            max_participants: Some(1),
            session_type: None,
        })
        .expect("session opens");

    let student = UserId("stu-2025-019".to_string());
    let booking = counselling
        .apply_for_session(
            &student,
            &session.id,
            SessionApplicationRequest {
                reason: "Two offers with different locations".to_string(),
                ..SessionApplicationRequest::default()
            },
        )
        .expect("seat available");

    assert_eq!(booking.status, BookingStatus::Applied);
    assert!(placement
        .applications_for_user(&student)
        .expect("listed")
        .is_empty());
}
