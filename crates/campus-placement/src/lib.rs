pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;
