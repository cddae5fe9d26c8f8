use chrono::{Duration, Utc};

use super::common::*;
use crate::workflows::counselling::domain::{
    BookingFilter, BookingStatus, BookingStatusUpdate, FeedbackRequest, NewSession,
    SessionApplicationRequest, SessionStatus, SessionType, Urgency,
};
use crate::workflows::counselling::repository::SessionRepository;
use crate::workflows::error::PlacementError;

#[test]
fn create_session_applies_defaults() {
    let (service, _) = build_service();
    let request = NewSession {
        max_participants: None,
        ..session_request(1)
    };

    let session = service.create_session(request).expect("session opens");
    assert_eq!(session.duration_minutes, 60);
    assert_eq!(session.location, "Counselling Room");
    assert_eq!(session.max_participants, 1);
    assert_eq!(session.session_type, SessionType::Individual);
    assert_eq!(session.status, SessionStatus::Scheduled);
}

#[test]
fn create_session_requires_counsellor_and_topic() {
    let (service, _) = build_service();
    let request = NewSession {
        counsellor_name: "  ".to_string(),
        ..session_request(1)
    };

    assert_eq!(
        service.create_session(request),
        Err(PlacementError::validation("Please add a counsellor name"))
    );
}

#[test]
fn capacity_admits_exactly_max_participants() {
    let (service, _) = build_service();
    let session = open_session(&service, 2);

    for suffix in 1..=2 {
        let booking = service
            .apply_for_session(&student(suffix), &session.id, booking_request())
            .expect("seat available");
        assert_eq!(booking.status, BookingStatus::Applied);
        assert_eq!(booking.urgency, Urgency::High);
        assert_eq!(booking.updates.len(), 1);
    }

    match service.apply_for_session(&student(3), &session.id, booking_request()) {
        Err(PlacementError::CapacityExceeded(message)) => assert_eq!(message, "Session is full"),
        other => panic!("expected capacity error, got {other:?}"),
    }
}

#[test]
fn cancelling_frees_a_seat() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");

    let cancelled = service
        .cancel_application(&student(1), &booking.id)
        .expect("cancel succeeds");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    let last = cancelled.updates.last().expect("history entry");
    assert_eq!(last.notes, "Cancelled by student");
    assert_eq!(last.updated_by, "student");

    service
        .apply_for_session(&student(2), &session.id, booking_request())
        .expect("freed seat is bookable");
}

#[test]
fn cancelling_twice_is_rejected() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");
    service
        .cancel_application(&student(1), &booking.id)
        .expect("first cancel");

    assert_eq!(
        service.cancel_application(&student(1), &booking.id),
        Err(PlacementError::validation("Cannot cancel this application"))
    );
}

#[test]
fn other_students_cannot_cancel() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");

    assert!(matches!(
        service.cancel_application(&student(2), &booking.id),
        Err(PlacementError::NotFound(_))
    ));
}

#[test]
fn duplicate_booking_is_a_conflict_even_after_cancelling() {
    let (service, _) = build_service();
    let session = open_session(&service, 3);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");
    service
        .cancel_application(&student(1), &booking.id)
        .expect("cancel");

    assert!(matches!(
        service.apply_for_session(&student(1), &session.id, booking_request()),
        Err(PlacementError::Conflict(_))
    ));
}

#[test]
fn blank_reason_and_missing_session_are_rejected() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);

    let blank = SessionApplicationRequest {
        reason: "   ".to_string(),
        ..booking_request()
    };
    assert!(matches!(
        service.apply_for_session(&student(1), &session.id, blank),
        Err(PlacementError::Validation(_))
    ));

    let missing = crate::workflows::counselling::SessionId("session-missing".to_string());
    assert_eq!(
        service.apply_for_session(&student(1), &missing, booking_request()),
        Err(PlacementError::not_found("Session not found"))
    );
}

#[test]
fn inactive_sessions_do_not_accept_bookings() {
    let (service, store) = build_service();
    let mut session = session_request(1)
        .into_session()
        .expect("valid session");
    session.status = SessionStatus::Completed;
    let session = store.insert_session(session).expect("stored");

    assert_eq!(
        service.apply_for_session(&student(1), &session.id, booking_request()),
        Err(PlacementError::validation(
            "Session is not available for applications"
        ))
    );
}

#[test]
fn feedback_requires_completed_booking_and_valid_rating() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");

    let feedback = FeedbackRequest {
        rating: 5,
        comments: Some("Very helpful".to_string()),
    };
    assert_eq!(
        service.submit_feedback(&student(1), &booking.id, feedback.clone()),
        Err(PlacementError::not_found("Completed application not found"))
    );

    service
        .update_application_status(
            &booking.id,
            BookingStatusUpdate {
                status: Some(BookingStatus::Completed),
                counsellor_notes: None,
            },
        )
        .expect("admin completes");

    let out_of_range = FeedbackRequest {
        rating: 6,
        comments: None,
    };
    assert!(matches!(
        service.submit_feedback(&student(1), &booking.id, out_of_range),
        Err(PlacementError::Validation(_))
    ));

    let updated = service
        .submit_feedback(&student(1), &booking.id, feedback)
        .expect("feedback stored");
    assert_eq!(updated.feedback.map(|feedback| feedback.rating), Some(5));
}

#[test]
fn admin_update_records_history_and_notes() {
    let (service, _) = build_service();
    let session = open_session(&service, 1);
    let booking = service
        .apply_for_session(&student(1), &session.id, booking_request())
        .expect("seat available");

    let confirmed = service
        .update_application_status(
            &booking.id,
            BookingStatusUpdate {
                status: Some(BookingStatus::Confirmed),
                counsellor_notes: None,
            },
        )
        .expect("confirmed");
    let last = confirmed.updates.last().expect("history entry");
    assert_eq!(last.notes, "Status updated to confirmed");
    assert_eq!(last.updated_by, "admin");

    let noted = service
        .update_application_status(
            &booking.id,
            BookingStatusUpdate {
                status: None,
                counsellor_notes: Some("Share mock interview slots".to_string()),
            },
        )
        .expect("noted");
    assert_eq!(noted.status, BookingStatus::Confirmed);
    assert_eq!(
        noted.counsellor_notes.as_deref(),
        Some("Share mock interview slots")
    );
}

#[test]
fn listings_filter_by_status_and_upcoming_date() {
    let (service, _) = build_service();
    let upcoming = open_session(&service, 2);
    service
        .create_session(NewSession {
            date: (Utc::now() - Duration::days(2)).date_naive(),
            ..session_request(1)
        })
        .expect("past session");

    let today = Utc::now().date_naive();
    assert_eq!(service.list_sessions(None).expect("listed").len(), 2);
    let future = service.list_sessions(Some(today)).expect("listed");
    assert_eq!(future.len(), 1);
    assert_eq!(future[0].id, upcoming.id);

    let first = service
        .apply_for_session(&student(1), &upcoming.id, booking_request())
        .expect("seat");
    service
        .apply_for_session(&student(2), &upcoming.id, booking_request())
        .expect("seat");
    service
        .cancel_application(&student(1), &first.id)
        .expect("cancel");

    let cancelled = service
        .list_applications(&BookingFilter {
            session_id: Some(upcoming.id.clone()),
            status: Some(BookingStatus::Cancelled),
        })
        .expect("listed");
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].user_id, student(1));

    assert_eq!(
        service
            .applications_for_user(&student(2))
            .expect("listed")
            .len(),
        1
    );
}
