//! Graphviz DOT rendering of a configured machine.
//!
//! Superstates become clusters containing their substates. Node labels list
//! the state's entry, exit and internal handlers, and every external rule
//! becomes an edge labelled with its trigger. The output is for
//! documentation and debugging; nothing parses it back.

use crate::core::{State, Trigger};
use crate::engine::representation::{Configuration, Rule, StateRepresentation};
use std::fmt::{self, Write};

pub(crate) fn render<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
    initial: &S,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_graph(config, initial, &mut out).expect("formatting into a String");
    out
}

fn write_graph<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
    initial: &S,
    out: &mut String,
) -> fmt::Result {
    out.push_str("digraph {\n");
    out.push_str("  compound=true;\n");
    out.push_str("  rankdir=\"LR\";\n");
    out.push_str("  node [shape=Mrecord];\n\n");

    for (state, rep) in config.states() {
        if rep.parent.is_none() {
            render_state(config, state, rep, 1, out)?;
        }
    }

    out.push('\n');
    for (state, rep) in config.states() {
        for (trigger, rule) in &rep.rules {
            let destination = match rule {
                Rule::Permit(destination) => destination,
                Rule::Reentry => state,
                Rule::Internal(_) => continue,
            };
            writeln!(
                out,
                "  {} -> {} [label={}];",
                quote(state.name()),
                quote(destination.name()),
                quote(trigger.name())
            )?;
        }
    }

    out.push_str("\n  init [label=\"\", shape=point];\n");
    writeln!(out, "  init -> {};", quote(initial.name()))?;
    out.push_str("}\n");
    Ok(())
}

fn render_state<K, S: State, T: Trigger, Env>(
    config: &Configuration<K, S, T, Env>,
    state: &S,
    rep: &StateRepresentation<K, S, T, Env>,
    depth: usize,
    out: &mut String,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let children: Vec<_> = config
        .states()
        .filter(|(_, child)| child.parent.as_ref() == Some(state))
        .collect();

    if children.is_empty() {
        return writeln!(out, "{indent}{} [label={}];", quote(state.name()), quote(&label(state, rep)));
    }

    writeln!(out, "{indent}subgraph {} {{", quote(&format!("cluster_{}", state.name())))?;
    writeln!(out, "{indent}  label={};", quote(state.name()))?;
    writeln!(out, "{indent}  {} [label={}];", quote(state.name()), quote(&label(state, rep)))?;
    for (child, child_rep) in children {
        render_state(config, child, child_rep, depth + 1, out)?;
    }
    writeln!(out, "{indent}}}")
}

/// Record label: the state name, then one line per handler.
fn label<K, S: State, T: Trigger, Env>(state: &S, rep: &StateRepresentation<K, S, T, Env>) -> String {
    let mut handlers = Vec::new();
    if rep.entry.is_some() {
        handlers.push("entry".to_string());
    }
    for (trigger, _) in &rep.entry_from {
        handlers.push(format!("entry from {}", trigger.name()));
    }
    if rep.exit.is_some() {
        handlers.push("exit".to_string());
    }
    for (trigger, rule) in &rep.rules {
        if let Rule::Internal(_) = rule {
            handlers.push(format!("{} / internal", trigger.name()));
        }
    }

    if handlers.is_empty() {
        state.name().to_string()
    } else {
        format!("{{{}|{}\\l}}", state.name(), handlers.join("\\l"))
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}
