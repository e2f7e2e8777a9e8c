//! Runtime engine: actions, fire processing and queued firing.
//!
//! Actions are Stillwater effects run against a machine-wide environment.
//! The engine itself stays free of per-entity data; everything it knows
//! about an entity arrives through the state accessor on each fire.

pub mod action;
pub mod error;
pub mod machine;
pub mod queue;
pub(crate) mod representation;

pub use action::{act, noop, Action, Transition};
pub use error::{ActionError, FireError};
pub use machine::StateMachine;
pub use queue::FiringMode;
