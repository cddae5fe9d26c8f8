use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::auth::UserId;
use crate::storage::MemoryStore;
use crate::workflows::counselling::domain::{
    CounsellingSession, NewSession, SessionApplicationRequest, Urgency,
};
use crate::workflows::counselling::CounsellingService;

pub(super) fn student(suffix: u32) -> UserId {
    UserId(format!("stu-{suffix}"))
}

pub(super) fn session_request(max_participants: u32) -> NewSession {
    NewSession {
        counsellor_name: "Dr. Rao".to_string(),
        topic: "Interview anxiety".to_string(),
        date: (Utc::now() + Duration::days(3)).date_naive(),
        time: "11:00 AM".to_string(),
        duration_minutes: None,
        location: None,
        description: None,
        max_participants: Some(max_participants),
        session_type: None,
    }
}

pub(super) fn booking_request() -> SessionApplicationRequest {
    SessionApplicationRequest {
        reason: "Nervous about upcoming interviews".to_string(),
        urgency: Some(Urgency::High),
        previous_counselling: None,
        notes: None,
    }
}

pub(super) fn build_service() -> (CounsellingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (CounsellingService::new(store.clone()), store)
}

pub(super) fn open_session(
    service: &CounsellingService<MemoryStore>,
    max_participants: u32,
) -> CounsellingSession {
    service
        .create_session(session_request(max_participants))
        .expect("session opens")
}
