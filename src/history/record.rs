//! Immutable transition records and the read-only history view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single state transition for one entity.
///
/// `sequence_id` is 1-based and increases by one per entity. The synthetic
/// record written on first access has no `from_state`.
///
/// # Example
///
/// ```rust
/// use hsm_ledger::history::LogRecord;
///
/// let first = LogRecord::initial(7u32, "OffHook");
/// assert_eq!(first.sequence_id, 1);
/// assert_eq!(first.from_state, None);
/// assert_eq!(first.remarks, "Initial \"OffHook\"");
///
/// let next = LogRecord::transition(2, 7u32, "OffHook", "Ringing");
/// assert_eq!(next.remarks, "From \"OffHook\" to \"Ringing\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord<K> {
    /// Position of this record in the entity's history, starting at 1
    pub sequence_id: u64,
    /// The entity this record belongs to
    pub entity_key: K,
    /// The state being left; `None` for the initial record
    pub from_state: Option<String>,
    /// The state being entered
    pub to_state: String,
    /// Human-readable description of the transition
    pub remarks: String,
    /// When the record was written
    pub recorded_at: DateTime<Utc>,
}

impl<K> LogRecord<K> {
    /// The synthetic first record for an entity.
    pub fn initial(entity_key: K, initial: &str) -> Self {
        Self {
            sequence_id: 1,
            entity_key,
            from_state: None,
            to_state: initial.to_string(),
            remarks: format!("Initial {:?}", initial),
            recorded_at: Utc::now(),
        }
    }

    /// A record for an accepted transition.
    pub fn transition(sequence_id: u64, entity_key: K, from: &str, to: &str) -> Self {
        Self {
            sequence_id,
            entity_key,
            from_state: Some(from.to_string()),
            to_state: to.to_string(),
            remarks: format!("From {:?} to {:?}", from, to),
            recorded_at: Utc::now(),
        }
    }

    /// True for the synthetic record written on first access.
    pub fn is_initial(&self) -> bool {
        self.from_state.is_none()
    }
}

/// Ordered, read-only copy of an entity's transition log.
///
/// A `History` is always a snapshot: it owns its records, so nothing a
/// caller does with it can reach the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct History<K> {
    records: Vec<LogRecord<K>>,
}

impl<K> History<K> {
    pub fn new(records: Vec<LogRecord<K>>) -> Self {
        Self { records }
    }

    /// All records in sequence order.
    pub fn records(&self) -> &[LogRecord<K>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord<K>> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&LogRecord<K>> {
        self.records.last()
    }

    /// The state the entity is in according to this snapshot.
    pub fn current_state(&self) -> Option<&str> {
        self.records.last().map(|r| r.to_state.as_str())
    }

    /// Names of the states traversed, in order, starting with the initial one.
    pub fn path(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.to_state.as_str()).collect()
    }

    /// Time between the first and the last record.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last
                .recorded_at
                .signed_duration_since(first.recorded_at)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    pub fn into_records(self) -> Vec<LogRecord<K>> {
        self.records
    }
}

impl<'a, K> IntoIterator for &'a History<K> {
    type Item = &'a LogRecord<K>;
    type IntoIter = std::slice::Iter<'a, LogRecord<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
