//! Macros for ergonomic state machine construction.

/// Generate a `State` implementation for a fieldless enum.
///
/// Variant names double as the tags written to the transition log, so
/// renaming a variant orphans any history recorded under the old name.
///
/// # Example
///
/// ```
/// use hsm_ledger::state_enum;
/// use hsm_ledger::core::State;
///
/// state_enum! {
///     pub enum CallState {
///         Idle,
///         Ringing,
///         Dropped,
///     }
///     final: [Dropped]
///     error: [Dropped]
/// }
///
/// assert_eq!(CallState::from_name("Ringing"), Some(CallState::Ringing));
/// assert!(CallState::Dropped.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate a `Trigger` implementation for a fieldless enum.
///
/// Trigger arguments are declared on the builder with
/// `set_trigger_parameter_shape`, not on the enum.
///
/// # Example
///
/// ```
/// use hsm_ledger::trigger_enum;
/// use hsm_ledger::core::Trigger;
///
/// trigger_enum! {
///     pub enum CallTrigger {
///         Dial,
///         HangUp,
///     }
/// }
///
/// assert_eq!(CallTrigger::HangUp.name(), "HangUp");
/// ```
#[macro_export]
macro_rules! trigger_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Trigger for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{State, Trigger};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
        final: [Complete, Failed]
        error: [Failed]
    }

    trigger_enum! {
        enum TestTrigger {
            Begin,
            Finish,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Initial;
        assert_eq!(state.name(), "Initial");
        assert!(!state.is_final());
        assert!(!state.is_error());

        let complete = TestState::Complete;
        assert!(complete.is_final());
        assert!(!complete.is_error());

        let failed = TestState::Failed;
        assert!(failed.is_final());
        assert!(failed.is_error());
    }

    #[test]
    fn state_names_round_trip() {
        for state in [
            TestState::Initial,
            TestState::Processing,
            TestState::Complete,
            TestState::Failed,
        ] {
            assert_eq!(TestState::from_name(state.name()), Some(state));
        }
        assert_eq!(TestState::from_name("initial"), None);
        assert_eq!(TestState::from_name(""), None);
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            final: [B]
        }

        let _state = PublicState::A;
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        let state = MinimalState::One;
        assert!(!state.is_final());
        assert!(!state.is_error());
    }

    #[test]
    fn trigger_enum_macro_generates_trait() {
        assert_eq!(TestTrigger::Begin.name(), "Begin");
        assert_eq!(TestTrigger::Finish.name(), "Finish");
        assert_ne!(TestTrigger::Begin, TestTrigger::Finish);
    }
}
