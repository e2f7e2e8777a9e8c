//! Core traits for states, triggers and entity keys.
//!
//! The engine never owns an entity's current state. It only needs to compare,
//! hash and name states so it can look up rules and hand a symbolic tag to
//! the external store.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// States are symbolic values. `name` and `from_name` must round-trip: the
/// transition log stores the name, and the state accessor decodes it back.
///
/// # Example
///
/// ```rust
/// use hsm_ledger::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum CallState {
///     Idle,
///     Talking,
///     Broken,
/// }
///
/// impl State for CallState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Talking => "Talking",
///             Self::Broken => "Broken",
///         }
///     }
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "Idle" => Some(Self::Idle),
///             "Talking" => Some(Self::Talking),
///             "Broken" => Some(Self::Broken),
///             _ => None,
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
///
/// assert_eq!(CallState::from_name(CallState::Talking.name()), Some(CallState::Talking));
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's symbolic name, as written to the transition log.
    fn name(&self) -> &str;

    /// Decode a state from its symbolic name.
    ///
    /// Returns `None` for tags that do not belong to this state type.
    fn from_name(name: &str) -> Option<Self>;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Trait for triggers (event types) that drive transitions.
pub trait Trigger: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the trigger's symbolic name for diagnostics and graph output.
    fn name(&self) -> &str;
}

/// Opaque identifier of the subject whose state is tracked.
///
/// Blanket-implemented for every type with the required bounds, so plain
/// integers, strings or newtypes can be used directly.
pub trait EntityKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<K> EntityKey for K where K: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
        Failed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
                Self::Failed => "Failed",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "Initial" => Some(Self::Initial),
                "Processing" => Some(Self::Processing),
                "Complete" => Some(Self::Complete),
                "Failed" => Some(Self::Failed),
                _ => None,
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Complete | Self::Failed)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Failed)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
        assert_eq!(TestState::Failed.name(), "Failed");
    }

    #[test]
    fn from_name_inverts_name() {
        for state in [
            TestState::Initial,
            TestState::Processing,
            TestState::Complete,
            TestState::Failed,
        ] {
            assert_eq!(TestState::from_name(state.name()), Some(state));
        }
    }

    #[test]
    fn from_name_rejects_unknown_tags() {
        assert_eq!(TestState::from_name(""), None);
        assert_eq!(TestState::from_name("initial"), None);
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::Initial.is_final());
        assert!(!TestState::Processing.is_final());
        assert!(TestState::Complete.is_final());
        assert!(TestState::Failed.is_final());
    }

    #[test]
    fn is_error_identifies_error_states() {
        assert!(!TestState::Complete.is_error());
        assert!(TestState::Failed.is_error());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Initial;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn entity_key_is_implemented_for_plain_types() {
        fn assert_key<K: EntityKey>(_: &K) {}
        assert_key(&7u32);
        assert_key(&"phone-7".to_string());
    }
}
