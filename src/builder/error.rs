//! Build errors for state machine configuration.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Making '{child}' a substate of '{parent}' would create a hierarchy cycle")]
    HierarchyCycle { child: String, parent: String },

    #[error("'{state}' is already a substate of '{existing}'")]
    ParentAlreadySet { state: String, existing: String },

    #[error("Invalid configuration: {}", summarize(.0))]
    InvalidConfiguration(Vec<ConfigViolation>),
}

/// A single problem found when validating a finished configuration.
///
/// Validation reports every violation at once rather than stopping at the
/// first one.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("state '{state}' declares trigger '{trigger}' more than once")]
    DuplicateRule { state: String, trigger: String },

    #[error("state '{state}' has an entry action for trigger '{trigger}', but no rule enters it that way")]
    OrphanEntryFrom { state: String, trigger: String },

    #[error("trigger '{trigger}' has a parameter shape but no state handles it")]
    UnusedParameterShape { trigger: String },
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
