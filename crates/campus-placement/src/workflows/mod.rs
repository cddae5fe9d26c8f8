pub mod calendar;
pub mod counselling;
pub mod error;
pub mod payload;
pub mod placement;
pub mod schedule_import;
