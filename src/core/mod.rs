//! Core state machine types.
//!
//! This module contains the pure vocabulary shared by every other area:
//! - States, triggers and entity keys via traits
//! - Trigger argument shapes as a sum type
//! - The per-request fire context
//!
//! Nothing in here performs I/O or holds per-entity data.

mod args;
mod context;
mod state;

pub use args::{ParamShape, TriggerArg};
pub(crate) use args::check_shape;
pub use context::FireContext;
pub use state::{EntityKey, State, Trigger};
