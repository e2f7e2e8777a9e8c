//! Whole-configuration validation using `Validation`.
//!
//! Every check runs and every violation is collected, so a caller fixing a
//! configuration sees all problems in one pass.

use crate::builder::error::ConfigViolation;
use crate::core::{State, Trigger};
use crate::engine::representation::{Configuration, Rule};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Validate a finished configuration, accumulating ALL violations.
pub(crate) fn validate<K, S: State, T: Trigger, Env>(config: &Configuration<K, S, T, Env>) -> Check {
    let mut checks: Vec<Check> = Vec::new();
    checks.extend(duplicate_rules(config));
    checks.extend(orphan_entry_actions(config));
    checks.extend(unused_parameter_shapes(config));

    Validation::all_vec(checks).map(|_| ())
}

fn duplicate_rules<K, S: State, T: Trigger, Env>(config: &Configuration<K, S, T, Env>) -> Vec<Check> {
    let mut checks = Vec::new();
    for (state, rep) in config.states() {
        let mut seen: Vec<&T> = Vec::new();
        let mut reported: Vec<&T> = Vec::new();
        for (trigger, _) in &rep.rules {
            if seen.contains(&trigger) && !reported.contains(&trigger) {
                reported.push(trigger);
                checks.push(Validation::fail(ConfigViolation::DuplicateRule {
                    state: state.name().to_string(),
                    trigger: trigger.name().to_string(),
                }));
            }
            seen.push(trigger);
        }
    }
    checks
}

fn orphan_entry_actions<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
) -> Vec<Check> {
    let mut checks = Vec::new();
    for (state, rep) in config.states() {
        for (trigger, _) in &rep.entry_from {
            if !enters_via(config, state, trigger) {
                checks.push(Validation::fail(ConfigViolation::OrphanEntryFrom {
                    state: state.name().to_string(),
                    trigger: trigger.name().to_string(),
                }));
            }
        }
    }
    checks
}

/// True when some rule fired with `trigger` can land inside `target`.
fn enters_via<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
    target: &S,
    trigger: &T,
) -> bool {
    config.states().any(|(source, rep)| {
        rep.rules.iter().any(|(t, rule)| {
            t == trigger
                && match rule {
                    Rule::Permit(destination) => config.includes(target, destination),
                    Rule::Reentry => config.includes(target, source),
                    Rule::Internal(_) => false,
                }
        })
    })
}

fn unused_parameter_shapes<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
) -> Vec<Check> {
    let mut checks = Vec::new();
    for (trigger, _) in config.shapes() {
        let handled = config
            .states()
            .any(|(_, rep)| rep.rules.iter().any(|(t, _)| t == trigger));
        if !handled {
            checks.push(Validation::fail(ConfigViolation::UnusedParameterShape {
                trigger: trigger.name().to_string(),
            }));
        }
    }
    checks
}
