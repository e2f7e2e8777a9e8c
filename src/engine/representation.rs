//! Immutable configuration model: per-state rules, actions and hierarchy.

use crate::core::{ParamShape, State, Trigger};
use crate::engine::action::Action;
use std::collections::HashMap;

/// How a state handles one trigger.
pub(crate) enum Rule<K, S, T, Env> {
    /// External transition to a destination state
    Permit(S),
    /// Leave and re-enter the current state, running exit then entry
    Reentry,
    /// Run an action without changing state
    Internal(Action<K, S, T, Env>),
}

/// Everything configured for a single state.
pub(crate) struct StateRepresentation<K, S, T, Env> {
    pub(crate) parent: Option<S>,
    pub(crate) rules: Vec<(T, Rule<K, S, T, Env>)>,
    pub(crate) entry: Option<Action<K, S, T, Env>>,
    pub(crate) entry_from: Vec<(T, Action<K, S, T, Env>)>,
    pub(crate) exit: Option<Action<K, S, T, Env>>,
}

impl<K, S, T: Trigger, Env> StateRepresentation<K, S, T, Env> {
    fn new() -> Self {
        Self {
            parent: None,
            rules: Vec::new(),
            entry: None,
            entry_from: Vec::new(),
            exit: None,
        }
    }

    pub(crate) fn rule(&self, trigger: &T) -> Option<&Rule<K, S, T, Env>> {
        self.rules
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, rule)| rule)
    }

    /// The entry action for arrivals via `trigger`: the trigger-specific one
    /// if registered, otherwise the generic one.
    pub(crate) fn entry_action(&self, trigger: &T) -> Option<&Action<K, S, T, Env>> {
        self.entry_from
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, action)| action)
            .or(self.entry.as_ref())
    }
}

/// The whole configured machine, frozen at build time.
pub(crate) struct Configuration<K, S, T, Env> {
    states: HashMap<S, StateRepresentation<K, S, T, Env>>,
    order: Vec<S>,
    shapes: HashMap<T, ParamShape>,
}

impl<K, S: State, T: Trigger, Env> Configuration<K, S, T, Env> {
    pub(crate) fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            shapes: HashMap::new(),
        }
    }

    pub(crate) fn representation(&self, state: &S) -> Option<&StateRepresentation<K, S, T, Env>> {
        self.states.get(state)
    }

    pub(crate) fn representation_mut(&mut self, state: &S) -> &mut StateRepresentation<K, S, T, Env> {
        if !self.states.contains_key(state) {
            self.order.push(state.clone());
        }
        self.states
            .entry(state.clone())
            .or_insert_with(StateRepresentation::new)
    }

    /// Configured states in the order they were first configured.
    pub(crate) fn states(&self) -> impl Iterator<Item = (&S, &StateRepresentation<K, S, T, Env>)> {
        self.order
            .iter()
            .filter_map(|s| self.states.get(s).map(|rep| (s, rep)))
    }

    pub(crate) fn set_shape(&mut self, trigger: T, shape: ParamShape) {
        self.shapes.insert(trigger, shape);
    }

    pub(crate) fn shape(&self, trigger: &T) -> Option<ParamShape> {
        self.shapes.get(trigger).copied()
    }

    pub(crate) fn shapes(&self) -> impl Iterator<Item = (&T, &ParamShape)> {
        self.shapes.iter()
    }

    pub(crate) fn parent(&self, state: &S) -> Option<&S> {
        self.states.get(state).and_then(|rep| rep.parent.as_ref())
    }

    /// `state` followed by each of its ancestors up to the root.
    pub(crate) fn lineage<'a>(&'a self, state: &'a S) -> Lineage<'a, K, S, T, Env> {
        Lineage {
            config: self,
            next: Some(state),
            remaining: self.states.len() + 1,
        }
    }

    /// True when `state` is `ancestor` or nested anywhere below it.
    pub(crate) fn includes(&self, ancestor: &S, state: &S) -> bool {
        self.lineage(state).any(|s| s == ancestor)
    }

    /// Find the rule for `trigger`, searching from `state` towards the root.
    ///
    /// The most specific state wins, so a substate's own rule shadows an
    /// inherited one for the same trigger.
    pub(crate) fn resolve(&self, state: &S, trigger: &T) -> Option<&Rule<K, S, T, Env>> {
        self.lineage(state)
            .filter_map(|s| self.states.get(s))
            .find_map(|rep| rep.rule(trigger))
    }

    /// Every trigger that resolves to a rule from `state`, most specific first.
    pub(crate) fn permitted_triggers(&self, state: &S) -> Vec<T> {
        let mut triggers: Vec<T> = Vec::new();
        for rep in self.lineage(state).filter_map(|s| self.states.get(s)) {
            for (trigger, _) in &rep.rules {
                if !triggers.contains(trigger) {
                    triggers.push(trigger.clone());
                }
            }
        }
        triggers
    }

    /// States left when moving from `source` to `destination`, innermost first.
    pub(crate) fn exit_path(&self, source: &S, destination: &S) -> Vec<S> {
        self.lineage(source)
            .take_while(|s| !self.includes(s, destination))
            .cloned()
            .collect()
    }

    /// States entered when moving from `source` to `destination`, outermost first.
    pub(crate) fn entry_path(&self, source: &S, destination: &S) -> Vec<S> {
        let mut path: Vec<S> = self
            .lineage(destination)
            .take_while(|s| !self.includes(s, source))
            .cloned()
            .collect();
        path.reverse();
        path
    }

    /// True when making `child` a substate of `parent` would close a cycle.
    pub(crate) fn would_cycle(&self, child: &S, parent: &S) -> bool {
        self.includes(child, parent)
    }
}

/// Iterator over a state and its ancestors.
///
/// Bounded by the number of configured states, so a malformed hierarchy can
/// never loop forever.
pub(crate) struct Lineage<'a, K, S, T, Env> {
    config: &'a Configuration<K, S, T, Env>,
    next: Option<&'a S>,
    remaining: usize,
}

impl<'a, K, S: State, T: Trigger, Env> Iterator for Lineage<'a, K, S, T, Env> {
    type Item = &'a S;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.config.parent(current);
        Some(current)
    }
}
