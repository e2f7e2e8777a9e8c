//! Errors returned by fire requests and action callbacks.

use crate::history::StorageError;
use thiserror::Error;

/// Error raised by an entry, exit or internal action.
///
/// Action errors abort the fire request that ran them and reach the caller
/// unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while firing a trigger.
#[derive(Debug, Error)]
pub enum FireError {
    /// The fire context did not carry an entity key
    #[error("Missing entity key: the fire context must name the entity being transitioned")]
    MissingEntityKey,

    /// No rule for the trigger in the current state or any of its ancestors
    #[error("Trigger '{trigger}' is not permitted in state '{state}'")]
    InvalidTransition { state: String, trigger: String },

    /// A trigger argument or proposed state had an unexpected shape
    #[error("Type mismatch for {subject}: expected {expected}, found {found}")]
    TypeMismatch {
        subject: String,
        expected: String,
        found: String,
    },

    /// The stored state could not be decoded
    #[error("Corrupt state for entity {entity}: {detail}")]
    CorruptState { entity: String, detail: String },

    /// An action callback failed
    #[error("Action failed: {0}")]
    Action(#[from] ActionError),

    /// The transition log backend failed
    #[error("Transition log failed: {0}")]
    Storage(#[from] StorageError),

    /// The runtime shut down while the request was running
    #[error("Fire request interrupted: the runtime shut down before it completed")]
    Interrupted,
}

impl FireError {
    /// True when the trigger was simply not allowed; the caller may branch on it.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// True for shape and storage-integrity violations, which are never retried.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::CorruptState { .. })
    }
}
