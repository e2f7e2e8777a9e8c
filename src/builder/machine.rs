//! Builder for constructing state machines.

use crate::adapters::{log_adapters, StateAccessor, StateMutator};
use crate::builder::error::BuildError;
use crate::builder::state::StateConfigurer;
use crate::builder::validate::validate;
use crate::core::{EntityKey, ParamShape, State, Trigger};
use crate::engine::representation::Configuration;
use crate::engine::{FiringMode, StateMachine};
use crate::history::TransitionLog;
use std::sync::Arc;

/// Builder for constructing state machines.
///
/// Machine-wide options use a consuming fluent API; per-state rules are
/// added through [`configure`](Self::configure). Nothing is validated until
/// [`build`](Self::build), except hierarchy cycles, which `substate_of`
/// rejects immediately.
pub struct StateMachineBuilder<K, S, T, Env> {
    initial: Option<S>,
    firing_mode: FiringMode,
    config: Configuration<K, S, T, Env>,
}

impl<K, S, T, Env> StateMachineBuilder<K, S, T, Env>
where
    K: EntityKey,
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            firing_mode: FiringMode::default(),
            config: Configuration::new(),
        }
    }

    /// Set the initial state (required).
    ///
    /// Every entity without a history starts here.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Choose how concurrent fire requests are ordered.
    pub fn firing_mode(mut self, mode: FiringMode) -> Self {
        self.firing_mode = mode;
        self
    }

    /// Start configuring `state`.
    pub fn configure(&mut self, state: S) -> StateConfigurer<'_, K, S, T, Env> {
        StateConfigurer::new(&mut self.config, state)
    }

    /// Require `trigger` to be fired with exactly one argument of `shape`.
    ///
    /// Triggers without a declared shape take no argument.
    pub fn set_trigger_parameter_shape(&mut self, trigger: T, shape: ParamShape) -> &mut Self {
        self.config.set_shape(trigger, shape);
        self
    }

    /// Build the state machine around external state storage.
    /// Returns an error if the initial state is missing or the
    /// configuration has violations.
    pub fn build(
        self,
        accessor: StateAccessor<K, S>,
        mutator: StateMutator<K, S>,
        env: Env,
    ) -> Result<StateMachine<K, S, T, Env>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        validate(&self.config)
            .into_result()
            .map_err(|errors| BuildError::InvalidConfiguration(errors.into_vec()))?;

        Ok(StateMachine::new(
            initial,
            self.config,
            accessor,
            mutator,
            env,
            self.firing_mode,
        ))
    }

    /// Build the state machine with state kept in a transition log.
    pub fn build_with_log<L>(
        self,
        log: Arc<L>,
        env: Env,
    ) -> Result<StateMachine<K, S, T, Env>, BuildError>
    where
        L: TransitionLog<K> + ?Sized + 'static,
    {
        let initial = self
            .initial
            .clone()
            .ok_or(BuildError::MissingInitialState)?;
        let (accessor, mutator) = log_adapters(log, initial);
        self.build(accessor, mutator, env)
    }
}

impl<K, S, T, Env> Default for StateMachineBuilder<K, S, T, Env>
where
    K: EntityKey,
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
