//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder for configuring states, their
//! hierarchy and their actions, plus macros for declaring state and trigger
//! enums with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;
mod validate;

pub use error::{BuildError, ConfigViolation};
pub use machine::StateMachineBuilder;
pub use state::StateConfigurer;
