//! Persistence contracts shared by the workflows, plus the in-memory document store.

mod memory;

use std::sync::atomic::{AtomicU64, Ordering};

pub use memory::MemoryStore;

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("capacity reached")]
    CapacityReached,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic identifier, e.g. `app-000042`.
pub fn next_sequence_id(prefix: &str) -> String {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}
