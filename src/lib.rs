//! hsm-ledger: hierarchical state machines over externally stored state
//!
//! One machine definition serves any number of entities. The machine never
//! holds an entity's state: every fire request reads it through a state
//! accessor and writes it back through a state mutator, both keyed by the
//! entity carried in a [`FireContext`](crate::core::FireContext). The bundled
//! adapters keep state in an append-only, per-entity transition log, so every
//! accepted transition leaves an audit record.
//!
//! # Core Concepts
//!
//! - **State / Trigger**: symbolic values via the `State` and `Trigger` traits
//! - **Hierarchy**: substates inherit their parent's rules unless they shadow them
//! - **Actions**: entry, exit and internal handlers as Stillwater effects
//! - **Queued firing**: fire requests run one at a time, in arrival order
//! - **History**: immutable `LogRecord`s per entity
//!
//! # Example
//!
//! ```rust
//! use hsm_ledger::builder::StateMachineBuilder;
//! use hsm_ledger::core::FireContext;
//! use hsm_ledger::history::InMemoryTransitionLog;
//! use hsm_ledger::{state_enum, trigger_enum};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! trigger_enum! {
//!     enum Push {
//!         Open,
//!         Close,
//!     }
//! }
//!
//! let mut builder = StateMachineBuilder::<u32, Door, Push, ()>::new().initial(Door::Closed);
//! builder.configure(Door::Closed).permit(Push::Open, Door::Open);
//! builder.configure(Door::Open).permit(Push::Close, Door::Closed);
//!
//! let log = Arc::new(InMemoryTransitionLog::new());
//! let machine = builder.build_with_log(log, ()).unwrap();
//!
//! let ctx = FireContext::for_entity(1);
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(machine.fire(&ctx, Push::Open)).unwrap();
//!
//! assert_eq!(machine.state(&ctx).unwrap(), Door::Open);
//! ```

pub mod adapters;
pub mod builder;
pub mod core;
pub mod engine;
mod graph;
pub mod history;
pub mod phone;

// Re-export commonly used types
pub use adapters::{StateAccessor, StateMutator};
pub use builder::{BuildError, StateMachineBuilder};
pub use crate::core::{EntityKey, FireContext, ParamShape, State, Trigger, TriggerArg};
pub use engine::{ActionError, FireError, FiringMode, StateMachine, Transition};
pub use history::{History, InMemoryTransitionLog, LogRecord, TransitionLog};
