//! Transition log error types.

use thiserror::Error;

/// Errors a transition log backend can report.
///
/// The in-memory log never fails; other backends (on-disk, remote) map
/// their own failures onto these variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// The backend could not be reached or is shutting down
    #[error("Transition log unavailable: {0}")]
    Unavailable(String),

    /// The backend refused to persist a record
    #[error("Transition log rejected write for entity {entity}: {reason}")]
    WriteRejected { entity: String, reason: String },
}
