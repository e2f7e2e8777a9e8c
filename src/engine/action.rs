//! Transition descriptions and effectful actions.

use crate::core::TriggerArg;
use crate::engine::error::ActionError;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Description of a transition handed to every action it runs.
///
/// For internal transitions `source` and `destination` are both the
/// entity's current state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<K, S, T> {
    pub entity: K,
    pub source: S,
    pub destination: S,
    pub trigger: T,
    pub arg: Option<TriggerArg>,
}

impl<K, S: PartialEq, T> Transition<K, S, T> {
    /// True when the transition leaves and re-enters the same state.
    pub fn is_reentry(&self) -> bool {
        self.source == self.destination
    }

    /// The text argument, if the trigger carries one.
    pub fn text(&self) -> Option<&str> {
        self.arg.as_ref().and_then(TriggerArg::as_text)
    }

    /// The integer argument, if the trigger carries one.
    pub fn int(&self) -> Option<i64> {
        self.arg.as_ref().and_then(TriggerArg::as_int)
    }
}

/// Factory producing a fresh effect for each execution of an action.
///
/// Effects are consumed when run, so the machine stores factories and calls
/// them once per fire.
pub type Action<K, S, T, Env> =
    Arc<dyn Fn(&Transition<K, S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync>;

/// An action effect that does nothing.
pub fn noop<Env>() -> BoxedEffect<(), ActionError, Env>
where
    Env: Clone + Send + Sync + 'static,
{
    pure::<(), ActionError, Env>(()).boxed()
}

/// Build an action effect from a synchronous function of the environment.
///
/// # Example
///
/// ```rust
/// use hsm_ledger::engine::{act, ActionError};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// #[derive(Clone, Default)]
/// struct Counter(Arc<AtomicUsize>);
///
/// let effect = act(|env: &Counter| {
///     env.0.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// });
/// # let _ = effect;
/// ```
pub fn act<Env, F>(f: F) -> BoxedEffect<(), ActionError, Env>
where
    Env: Clone + Send + Sync + 'static,
    F: FnOnce(&Env) -> Result<(), ActionError> + Send + 'static,
{
    from_fn(f).boxed()
}
