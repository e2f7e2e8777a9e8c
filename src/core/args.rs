//! Trigger arguments as a closed sum type.
//!
//! A trigger either takes no argument or exactly one argument of a declared
//! shape. Shapes are checked when a trigger is fired, before the request is
//! queued, so actions never have to downcast.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shape a trigger's single argument must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamShape {
    Int,
    Text,
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// A single trigger argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerArg {
    Int(i64),
    Text(String),
}

impl TriggerArg {
    /// The shape of this argument.
    pub fn shape(&self) -> ParamShape {
        match self {
            Self::Int(_) => ParamShape::Int,
            Self::Text(_) => ParamShape::Text,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Int(_) => None,
        }
    }
}

impl From<i64> for TriggerArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for TriggerArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for TriggerArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Describe what was supplied for a trigger, for mismatch reports.
fn describe(arg: Option<&TriggerArg>) -> String {
    match arg {
        Some(arg) => arg.shape().to_string(),
        None => "no argument".to_string(),
    }
}

/// Check a supplied argument against a declared shape.
///
/// Returns `Err((expected, found))` descriptions on mismatch.
pub(crate) fn check_shape(
    declared: Option<ParamShape>,
    supplied: Option<&TriggerArg>,
) -> Result<(), (String, String)> {
    match (declared, supplied) {
        (None, None) => Ok(()),
        (Some(shape), Some(arg)) if arg.shape() == shape => Ok(()),
        (Some(shape), other) => Err((shape.to_string(), describe(other))),
        (None, other) => Err(("no argument".to_string(), describe(other))),
    }
}
