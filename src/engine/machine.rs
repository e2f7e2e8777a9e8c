//! State machine runtime over externally stored state.

use crate::adapters::{StateAccessor, StateMutator};
use crate::core::{check_shape, EntityKey, FireContext, ParamShape, State, Trigger, TriggerArg};
use crate::engine::action::{Action, Transition};
use crate::engine::error::FireError;
use crate::engine::queue::{FireQueue, FiringMode};
use crate::engine::representation::{Configuration, Rule};
use crate::graph;
use std::sync::Arc;
use stillwater::effect::Effect;
use tracing::{debug, info, trace};

/// A configured hierarchical state machine shared by many entities.
///
/// The machine holds rules and actions only. Each fire request reads the
/// entity's state through the accessor, applies the matching rule and
/// persists the result through the mutator, one request at a time per
/// queue lane (see [`FiringMode`]).
///
/// Once a request reaches the head of its queue it runs on its own Tokio
/// task, so it completes even if the caller stops waiting for it.
pub struct StateMachine<K: EntityKey, S: State, T: Trigger, Env> {
    initial: S,
    runtime: Arc<Runtime<K, S, T, Env>>,
    queue: FireQueue<K>,
}

/// Everything a dequeued request needs, shared with the task running it.
struct Runtime<K: EntityKey, S: State, T: Trigger, Env> {
    config: Configuration<K, S, T, Env>,
    accessor: StateAccessor<K, S>,
    mutator: StateMutator<K, S>,
    env: Env,
}

impl<K, S, T, Env> StateMachine<K, S, T, Env>
where
    K: EntityKey,
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        initial: S,
        config: Configuration<K, S, T, Env>,
        accessor: StateAccessor<K, S>,
        mutator: StateMutator<K, S>,
        env: Env,
        mode: FiringMode,
    ) -> Self {
        Self {
            initial,
            runtime: Arc::new(Runtime {
                config,
                accessor,
                mutator,
                env,
            }),
            queue: FireQueue::new(mode),
        }
    }

    /// The state every entity starts in.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    pub fn firing_mode(&self) -> FiringMode {
        self.queue.mode()
    }

    /// The environment actions run against.
    pub fn environment(&self) -> &Env {
        &self.runtime.env
    }

    /// The argument shape declared for `trigger`, if any.
    pub fn parameter_shape(&self, trigger: &T) -> Option<ParamShape> {
        self.runtime.config.shape(trigger)
    }

    /// Current state of the entity named by `ctx`.
    pub fn state(&self, ctx: &FireContext<K>) -> Result<S, FireError> {
        (self.runtime.accessor)(ctx)
    }

    /// True when the entity is in `state` or in any of its substates.
    pub fn is_in_state(&self, ctx: &FireContext<K>, state: &S) -> Result<bool, FireError> {
        let current = self.state(ctx)?;
        Ok(self.runtime.config.includes(state, &current))
    }

    /// True when `trigger` has a rule from the entity's current state.
    pub fn can_fire(&self, ctx: &FireContext<K>, trigger: &T) -> Result<bool, FireError> {
        let current = self.state(ctx)?;
        Ok(self.runtime.config.resolve(&current, trigger).is_some())
    }

    /// Triggers with a rule from the entity's current state, own rules first.
    pub fn permitted_triggers(&self, ctx: &FireContext<K>) -> Result<Vec<T>, FireError> {
        let current = self.state(ctx)?;
        Ok(self.runtime.config.permitted_triggers(&current))
    }

    /// Fire a trigger that takes no argument.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn fire(&self, ctx: &FireContext<K>, trigger: T) -> Result<(), FireError> {
        self.dispatch(ctx, trigger, None).await
    }

    /// Fire a trigger with its declared argument.
    pub async fn fire_with(
        &self,
        ctx: &FireContext<K>,
        trigger: T,
        arg: impl Into<TriggerArg>,
    ) -> Result<(), FireError> {
        self.dispatch(ctx, trigger, Some(arg.into())).await
    }

    /// Render the configured states and rules as Graphviz DOT.
    pub fn to_graph(&self) -> String {
        graph::render(&self.runtime.config, &self.initial)
    }

    async fn dispatch(
        &self,
        ctx: &FireContext<K>,
        trigger: T,
        arg: Option<TriggerArg>,
    ) -> Result<(), FireError> {
        let key = ctx.entity_key()?.clone();
        check_shape(self.runtime.config.shape(&trigger), arg.as_ref()).map_err(
            |(expected, found)| FireError::TypeMismatch {
                subject: format!("trigger '{}'", trigger.name()),
                expected,
                found,
            },
        )?;

        debug!(entity = ?key, trigger = trigger.name(), "fire queued");
        let slot = self.queue.enter(&key).await;

        // Dropping the caller's future before this point leaves the queue
        // untouched. From here on the request belongs to its own task.
        let runtime = Arc::clone(&self.runtime);
        let ctx = ctx.clone();
        let request = tokio::spawn(async move {
            let _slot = slot;
            runtime.process(&ctx, &key, trigger, arg).await
        });

        match request.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(FireError::Interrupted),
        }
    }
}

impl<K, S, T, Env> Runtime<K, S, T, Env>
where
    K: EntityKey,
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    /// Apply one fire request. Runs inside the request's queue slot.
    async fn process(
        &self,
        ctx: &FireContext<K>,
        key: &K,
        trigger: T,
        arg: Option<TriggerArg>,
    ) -> Result<(), FireError> {
        let source = (self.accessor)(ctx)?;
        let Some(rule) = self.config.resolve(&source, &trigger) else {
            debug!(
                entity = ?key,
                state = source.name(),
                trigger = trigger.name(),
                "no rule for trigger"
            );
            return Err(FireError::InvalidTransition {
                state: source.name().to_string(),
                trigger: trigger.name().to_string(),
            });
        };

        match rule {
            Rule::Internal(action) => {
                let transition = Transition {
                    entity: key.clone(),
                    source: source.clone(),
                    destination: source,
                    trigger,
                    arg,
                };
                trace!(
                    entity = ?key,
                    state = transition.source.name(),
                    trigger = transition.trigger.name(),
                    "running internal action"
                );
                self.run(action, &transition).await
            }
            Rule::Permit(destination) if *destination == source => {
                debug!(
                    entity = ?key,
                    state = source.name(),
                    trigger = trigger.name(),
                    "transition targets current state, ignored"
                );
                Ok(())
            }
            Rule::Permit(destination) => {
                let transition = Transition {
                    entity: key.clone(),
                    source,
                    destination: destination.clone(),
                    trigger,
                    arg,
                };
                let exits = self.config.exit_path(&transition.source, destination);
                let entries = self.config.entry_path(&transition.source, destination);
                self.apply(ctx, &transition, &exits, &entries).await?;
                info!(
                    entity = ?key,
                    from = transition.source.name(),
                    to = transition.destination.name(),
                    trigger = transition.trigger.name(),
                    "transition applied"
                );
                Ok(())
            }
            Rule::Reentry => {
                let transition = Transition {
                    entity: key.clone(),
                    source: source.clone(),
                    destination: source.clone(),
                    trigger,
                    arg,
                };
                let path = [source];
                self.apply(ctx, &transition, &path, &path).await?;
                debug!(
                    entity = ?key,
                    state = transition.source.name(),
                    trigger = transition.trigger.name(),
                    "state re-entered"
                );
                Ok(())
            }
        }
    }

    /// Run exit actions innermost first, then entry actions outermost
    /// first, then persist the destination.
    async fn apply(
        &self,
        ctx: &FireContext<K>,
        transition: &Transition<K, S, T>,
        exits: &[S],
        entries: &[S],
    ) -> Result<(), FireError> {
        for state in exits {
            let exit = self
                .config
                .representation(state)
                .and_then(|rep| rep.exit.as_ref());
            if let Some(action) = exit {
                trace!(entity = ?transition.entity, state = state.name(), "running exit action");
                self.run(action, transition).await?;
            }
        }

        for state in entries {
            let entry = self
                .config
                .representation(state)
                .and_then(|rep| rep.entry_action(&transition.trigger));
            if let Some(action) = entry {
                trace!(entity = ?transition.entity, state = state.name(), "running entry action");
                self.run(action, transition).await?;
            }
        }

        (self.mutator)(ctx, &transition.destination)
    }

    async fn run(
        &self,
        action: &Action<K, S, T, Env>,
        transition: &Transition<K, S, T>,
    ) -> Result<(), FireError> {
        action(transition).run(&self.env).await?;
        Ok(())
    }
}
