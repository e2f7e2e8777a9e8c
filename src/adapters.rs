//! State accessor and mutator: the bridge between the engine and storage.
//!
//! The engine never holds an entity's state. It reads it through a
//! [`StateAccessor`] and writes it through a [`StateMutator`], both keyed by
//! the entity carried in the [`FireContext`]. The functions here build both
//! over any [`TransitionLog`].

use crate::core::{EntityKey, FireContext, State};
use crate::engine::FireError;
use crate::history::TransitionLog;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reads the current state of the entity named by the context.
pub type StateAccessor<K, S> = Arc<dyn Fn(&FireContext<K>) -> Result<S, FireError> + Send + Sync>;

/// Persists a proposed state for the entity named by the context.
pub type StateMutator<K, S> =
    Arc<dyn Fn(&FireContext<K>, &S) -> Result<(), FireError> + Send + Sync>;

/// Accessor backed by a transition log.
///
/// An entity with no records is lazily given its initial record, so the
/// first read of any entity returns `initial`.
pub fn log_accessor<K, S, L>(log: Arc<L>, initial: S) -> StateAccessor<K, S>
where
    K: EntityKey,
    S: State,
    L: TransitionLog<K> + ?Sized + 'static,
{
    Arc::new(move |ctx: &FireContext<K>| -> Result<S, FireError> {
        let key = ctx.entity_key()?;
        let record = log.get_last_or_insert(key, initial.name())?;
        decode(key, &record.to_state)
    })
}

/// Mutator backed by a transition log.
///
/// Re-reads the current state through `accessor` and appends a record only
/// when the proposed state differs from it.
pub fn log_mutator<K, S, L>(log: Arc<L>, accessor: StateAccessor<K, S>) -> StateMutator<K, S>
where
    K: EntityKey,
    S: State,
    L: TransitionLog<K> + ?Sized + 'static,
{
    Arc::new(
        move |ctx: &FireContext<K>, proposed: &S| -> Result<(), FireError> {
            let key = ctx.entity_key()?;
            let tag = encode(proposed)?;
            let current = accessor(ctx)?;

            if current == *proposed {
                debug!(entity = ?key, state = tag, "state unchanged, nothing recorded");
                return Ok(());
            }

            let record = log.append(key, current.name(), tag)?;
            trace!(
                entity = ?key,
                sequence_id = record.sequence_id,
                remarks = %record.remarks,
                "transition recorded"
            );
            Ok(())
        },
    )
}

/// Build a matching accessor and mutator over one log.
pub fn log_adapters<K, S, L>(log: Arc<L>, initial: S) -> (StateAccessor<K, S>, StateMutator<K, S>)
where
    K: EntityKey,
    S: State,
    L: TransitionLog<K> + ?Sized + 'static,
{
    let accessor = log_accessor(Arc::clone(&log), initial);
    let mutator = log_mutator(log, Arc::clone(&accessor));
    (accessor, mutator)
}

fn decode<K: EntityKey, S: State>(key: &K, tag: &str) -> Result<S, FireError> {
    S::from_name(tag).ok_or_else(|| FireError::CorruptState {
        entity: format!("{key:?}"),
        detail: format!("unknown state tag '{tag}'"),
    })
}

/// The log tag for `state`, provided it decodes back to the same state.
fn encode<S: State>(state: &S) -> Result<&str, FireError> {
    let tag = state.name();
    match S::from_name(tag) {
        Some(decoded) if decoded == *state => Ok(tag),
        _ => Err(FireError::TypeMismatch {
            subject: "proposed state".to_string(),
            expected: "a recognized state".to_string(),
            found: format!("{state:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{InMemoryTransitionLog, LogRecord, StorageError};
    use crate::state_enum;
    use serde::{Deserialize, Serialize};

    state_enum! {
        enum Call {
            Idle,
            Ringing,
            Talking,
        }
    }

    fn adapters() -> (
        Arc<InMemoryTransitionLog<u32>>,
        StateAccessor<u32, Call>,
        StateMutator<u32, Call>,
    ) {
        let log = Arc::new(InMemoryTransitionLog::new());
        let (accessor, mutator) = log_adapters(Arc::clone(&log), Call::Idle);
        (log, accessor, mutator)
    }

    #[test]
    fn first_read_synthesizes_initial_record() {
        let (log, accessor, _) = adapters();
        let ctx = FireContext::for_entity(7);

        assert_eq!(accessor(&ctx).unwrap(), Call::Idle);
        assert_eq!(accessor(&ctx).unwrap(), Call::Idle);

        let history = log.history(&7).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_initial());
        assert_eq!(history[0].to_state, "Idle");
    }

    #[test]
    fn mutator_appends_transition_from_current_state() {
        let (log, accessor, mutator) = adapters();
        let ctx = FireContext::for_entity(7);

        mutator(&ctx, &Call::Ringing).unwrap();
        mutator(&ctx, &Call::Talking).unwrap();

        assert_eq!(accessor(&ctx).unwrap(), Call::Talking);
        let history = log.history(&7).unwrap();
        let sequence: Vec<u64> = history.iter().map(|r| r.sequence_id).collect();
        assert_eq!(sequence, vec![1, 2, 3]);
        assert_eq!(history[1].from_state.as_deref(), Some("Idle"));
        assert_eq!(history[2].from_state.as_deref(), Some("Ringing"));
    }

    #[test]
    fn mutator_suppresses_identical_state() {
        let (log, _, mutator) = adapters();
        let ctx = FireContext::for_entity(7);

        mutator(&ctx, &Call::Ringing).unwrap();
        mutator(&ctx, &Call::Ringing).unwrap();

        assert_eq!(log.history(&7).unwrap().len(), 2);
    }

    #[test]
    fn adapters_require_entity_key() {
        let (log, accessor, mutator) = adapters();
        let ctx = FireContext::new();

        assert!(matches!(accessor(&ctx), Err(FireError::MissingEntityKey)));
        assert!(matches!(mutator(&ctx, &Call::Ringing), Err(FireError::MissingEntityKey)));
        assert!(log.entities().is_empty());
    }

    #[test]
    fn unknown_stored_tag_is_corrupt_state() {
        let log = Arc::new(InMemoryTransitionLog::new());
        log.get_last_or_insert(&3u32, "Disconnected").unwrap();
        let accessor = log_accessor(log, Call::Idle);

        match accessor(&FireContext::for_entity(3)) {
            Err(FireError::CorruptState { entity, detail }) => {
                assert_eq!(entity, "3");
                assert!(detail.contains("Disconnected"));
            }
            other => panic!("Expected CorruptState, got {other:?}"),
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Lossy {
        Known,
        Unnamed,
    }

    impl State for Lossy {
        fn name(&self) -> &str {
            match self {
                Self::Known => "Known",
                Self::Unnamed => "",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            (name == "Known").then_some(Self::Known)
        }
    }

    #[test]
    fn unencodable_state_is_type_mismatch() {
        let log = Arc::new(InMemoryTransitionLog::new());
        let (_, mutator) = log_adapters(Arc::clone(&log), Lossy::Known);

        let err = mutator(&FireContext::for_entity(1u32), &Lossy::Unnamed).unwrap_err();

        assert!(matches!(err, FireError::TypeMismatch { .. }));
        assert!(log.history(&1).unwrap().is_empty());
    }

    struct ReadOnlyLog(InMemoryTransitionLog<u32>);

    impl TransitionLog<u32> for ReadOnlyLog {
        fn get_last_or_insert(&self, key: &u32, initial: &str) -> Result<LogRecord<u32>, StorageError> {
            self.0.get_last_or_insert(key, initial)
        }

        fn history(&self, key: &u32) -> Result<Vec<LogRecord<u32>>, StorageError> {
            self.0.history(key)
        }

        fn append(&self, key: &u32, _: &str, _: &str) -> Result<LogRecord<u32>, StorageError> {
            Err(StorageError::WriteRejected {
                entity: key.to_string(),
                reason: "read-only".to_string(),
            })
        }
    }

    #[test]
    fn storage_failures_surface_as_fire_errors() {
        let log: Arc<dyn TransitionLog<u32>> =
            Arc::new(ReadOnlyLog(InMemoryTransitionLog::new()));
        let (accessor, mutator) = log_adapters(log, Call::Idle);
        let ctx = FireContext::for_entity(2);

        let err = mutator(&ctx, &Call::Ringing).unwrap_err();

        assert!(matches!(err, FireError::Storage(StorageError::WriteRejected { .. })));
        assert_eq!(accessor(&ctx).unwrap(), Call::Idle);
    }
}
