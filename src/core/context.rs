//! Execution context threaded through every fire request.

use crate::engine::FireError;

/// Context for a single fire request.
///
/// The only thing the engine needs from a context is the entity key. It is
/// optional so that the engine can report a forgotten key as
/// [`FireError::MissingEntityKey`] instead of guessing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireContext<K> {
    entity: Option<K>,
}

impl<K> Default for FireContext<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FireContext<K> {
    /// An empty context carrying no entity key.
    pub fn new() -> Self {
        Self { entity: None }
    }

    /// A context scoped to one entity.
    pub fn for_entity(key: K) -> Self {
        Self { entity: Some(key) }
    }

    /// Return this context scoped to `key`, replacing any previous key.
    pub fn with_entity(mut self, key: K) -> Self {
        self.entity = Some(key);
        self
    }

    /// Resolve the entity key.
    pub fn entity_key(&self) -> Result<&K, FireError> {
        self.entity.as_ref().ok_or(FireError::MissingEntityKey)
    }
}
