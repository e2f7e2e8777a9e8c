//! In-memory transition log.

use crate::core::EntityKey;
use crate::history::{LogRecord, StorageError, TransitionLog};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Transition log backed by a map guarded by a single reader-writer lock.
///
/// Reads take the shared lock and copy records out before returning.
/// Writes take the exclusive lock. Ordering across several calls for the
/// same entity is the engine's job, not the store's.
pub struct InMemoryTransitionLog<K: EntityKey> {
    logs: RwLock<HashMap<K, Vec<LogRecord<K>>>>,
}

impl<K: EntityKey> InMemoryTransitionLog<K> {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
        }
    }

    /// Keys of every entity that has at least one record.
    pub fn entities(&self) -> Vec<K> {
        self.logs.read().keys().cloned().collect()
    }
}

impl<K: EntityKey> Default for InMemoryTransitionLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKey> TransitionLog<K> for InMemoryTransitionLog<K> {
    fn get_last_or_insert(&self, key: &K, initial: &str) -> Result<LogRecord<K>, StorageError> {
        if let Some(last) = self.logs.read().get(key).and_then(|records| records.last()) {
            return Ok(last.clone());
        }

        let mut logs = self.logs.write();
        let records = logs.entry(key.clone()).or_default();
        if records.is_empty() {
            records.push(LogRecord::initial(key.clone(), initial));
        }
        // Non-empty by construction above.
        Ok(records[records.len() - 1].clone())
    }

    fn history(&self, key: &K) -> Result<Vec<LogRecord<K>>, StorageError> {
        Ok(self.logs.read().get(key).cloned().unwrap_or_default())
    }

    fn append(&self, key: &K, from: &str, to: &str) -> Result<LogRecord<K>, StorageError> {
        let mut logs = self.logs.write();
        let records = match logs.get_mut(key) {
            Some(records) if !records.is_empty() => records,
            _ => {
                return Err(StorageError::WriteRejected {
                    entity: format!("{key:?}"),
                    reason: "no initial record".to_string(),
                })
            }
        };
        let record = LogRecord::transition(records.len() as u64 + 1, key.clone(), from, to);
        records.push(record.clone());
        Ok(record)
    }
}
