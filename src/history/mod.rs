//! Per-entity transition ledger.
//!
//! The log store is the only place an entity's state lives. Each entity has
//! an append-only, ordered list of [`LogRecord`]s whose last `to_state` is
//! the entity's current state.
//!
//! Any backend satisfying [`TransitionLog`] can be plugged into the engine
//! through the adapters in [`crate::adapters`]; [`InMemoryTransitionLog`] is
//! the bundled one.

mod error;
mod memory;
mod record;

pub use error::StorageError;
pub use memory::InMemoryTransitionLog;
pub use record::{History, LogRecord};

use crate::core::EntityKey;

/// Storage contract consumed by the state accessor and mutator.
///
/// Implementations must be safe under concurrent calls from many entities.
/// They need plain mutual exclusion per call only: the engine's queue
/// already orders calls that target the same entity.
pub trait TransitionLog<K: EntityKey>: Send + Sync {
    /// Return the most recent record for `key`, inserting the initial record
    /// first if the entity has none.
    fn get_last_or_insert(&self, key: &K, initial: &str) -> Result<LogRecord<K>, StorageError>;

    /// Copy out every record for `key` in sequence order.
    ///
    /// An entity that has never been accessed has an empty history.
    fn history(&self, key: &K) -> Result<Vec<LogRecord<K>>, StorageError>;

    /// Append a transition record, assigning the next sequence id.
    ///
    /// The entity must already have its initial record (see
    /// [`get_last_or_insert`](Self::get_last_or_insert)); appending to an
    /// empty history is rejected with [`StorageError::WriteRejected`].
    fn append(&self, key: &K, from: &str, to: &str) -> Result<LogRecord<K>, StorageError>;
}
