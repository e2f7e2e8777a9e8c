//! Per-state configuration with a fluent API.

use crate::builder::error::BuildError;
use crate::core::{EntityKey, State, Trigger};
use crate::engine::representation::{Configuration, Rule};
use crate::engine::{ActionError, Transition};
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Fluent configurer for one state, returned by
/// [`StateMachineBuilder::configure`](crate::builder::StateMachineBuilder::configure).
pub struct StateConfigurer<'a, K, S, T, Env> {
    config: &'a mut Configuration<K, S, T, Env>,
    state: S,
}

impl<'a, K, S, T, Env> StateConfigurer<'a, K, S, T, Env>
where
    K: EntityKey,
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(config: &'a mut Configuration<K, S, T, Env>, state: S) -> Self {
        config.representation_mut(&state);
        Self { config, state }
    }

    /// The state being configured.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Allow `trigger` to move this state (and its substates) to `destination`.
    ///
    /// Permitting a trigger that leads back to the current state is accepted
    /// but runs nothing and writes nothing; use
    /// [`permit_reentry`](Self::permit_reentry) to run exit and entry actions.
    pub fn permit(self, trigger: T, destination: S) -> Self {
        self.push_rule(trigger, Rule::Permit(destination))
    }

    /// Allow `trigger` to exit and re-enter this state.
    pub fn permit_reentry(self, trigger: T) -> Self {
        self.push_rule(trigger, Rule::Reentry)
    }

    /// Handle `trigger` by running `action` without changing state.
    pub fn internal_transition<F>(self, trigger: T, action: F) -> Self
    where
        F: Fn(&Transition<K, S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        self.push_rule(trigger, Rule::Internal(Arc::new(action)))
    }

    /// Run `action` whenever this state is entered.
    pub fn on_entry<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<K, S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        self.config.representation_mut(&self.state).entry = Some(Arc::new(action));
        self
    }

    /// Run `action` instead of the generic entry action when this state is
    /// entered via `trigger`.
    pub fn on_entry_from<F>(self, trigger: T, action: F) -> Self
    where
        F: Fn(&Transition<K, S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        let rep = self.config.representation_mut(&self.state);
        rep.entry_from.retain(|(t, _)| *t != trigger);
        rep.entry_from.push((trigger, Arc::new(action)));
        self
    }

    /// Run `action` whenever this state is exited.
    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<K, S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        self.config.representation_mut(&self.state).exit = Some(Arc::new(action));
        self
    }

    /// Nest this state under `parent`, inheriting its rules.
    ///
    /// Rejects any parent that would close a cycle, including the state
    /// itself, and any attempt to change an already assigned parent.
    pub fn substate_of(self, parent: S) -> Result<Self, BuildError> {
        if self.config.would_cycle(&self.state, &parent) {
            return Err(BuildError::HierarchyCycle {
                child: self.state.name().to_string(),
                parent: parent.name().to_string(),
            });
        }

        let rep = self.config.representation_mut(&self.state);
        if let Some(existing) = &rep.parent {
            if *existing != parent {
                return Err(BuildError::ParentAlreadySet {
                    state: self.state.name().to_string(),
                    existing: existing.name().to_string(),
                });
            }
        }
        rep.parent = Some(parent.clone());

        self.config.representation_mut(&parent);
        Ok(self)
    }

    fn push_rule(self, trigger: T, rule: Rule<K, S, T, Env>) -> Self {
        self.config
            .representation_mut(&self.state)
            .rules
            .push((trigger, rule));
        self
    }
}
