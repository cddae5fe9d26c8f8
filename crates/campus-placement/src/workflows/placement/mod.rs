//! Company drives, student applications, and the stage progression engine.

pub mod domain;
pub mod progression;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, Drive, DriveId, NewDrive, ScheduleItem,
    StageUpdate,
};
pub use progression::{Advancement, StagePosition, StageProgression, COMPLETION_MESSAGE};
pub use repository::{ApplicationRepository, DriveRepository};
pub use router::placement_router;
pub use service::PlacementService;
