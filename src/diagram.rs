//! This module flattens an automaton into the pieces a graph renderer needs: its states,
//! initial state, final states and a labelled edge list. Nothing is rendered here.

use crate::definition::{Automaton, DfaDefinition, NpdaDefinition, NtmDefinition};
use crate::types::{State, EPSILON_ALIAS};
use serde::Serialize;
use std::collections::BTreeSet;

/// A directed, labelled edge between two states.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub source: State,
    pub label: String,
    pub destination: State,
}

impl Edge {
    fn new(source: &str, label: String, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            label,
            destination: destination.to_string(),
        }
    }
}

/// Structure of an automaton as a directed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    pub states: BTreeSet<State>,
    pub initial_state: State,
    pub final_states: BTreeSet<State>,
    /// Sorted by source, then label, then destination.
    pub edges: Vec<Edge>,
}

impl From<&Automaton> for Diagram {
    fn from(automaton: &Automaton) -> Self {
        let mut edges = match automaton {
            Automaton::Dfa(dfa) => dfa_edges(dfa),
            Automaton::Npda(npda) => npda_edges(npda),
            Automaton::Ntm(ntm) => ntm_edges(ntm),
        };
        edges.sort();

        Diagram {
            states: automaton.states().clone(),
            initial_state: automaton.initial_state().to_string(),
            final_states: automaton.final_states().clone(),
            edges,
        }
    }
}

fn or_epsilon(symbols: &str) -> &str {
    if symbols.is_empty() {
        EPSILON_ALIAS
    } else {
        symbols
    }
}

/// Edges labelled with the consumed symbol, e.g. `a`.
fn dfa_edges(dfa: &DfaDefinition) -> Vec<Edge> {
    dfa.transitions()
        .iter()
        .flat_map(|(source, row)| {
            row.iter()
                .map(move |(symbol, destination)| Edge::new(source, symbol.clone(), destination))
        })
        .collect()
}

/// Edges labelled `input, top -> replacement`, with `ε` for an empty input or replacement.
fn npda_edges(npda: &NpdaDefinition) -> Vec<Edge> {
    let mut edges = Vec::new();

    for (source, by_input) in npda.transitions() {
        for (input, by_stack) in by_input {
            for (top, actions) in by_stack {
                for action in actions {
                    let label = format!(
                        "{}, {} -> {}",
                        or_epsilon(input),
                        top,
                        or_epsilon(action.replacement())
                    );
                    edges.push(Edge::new(source, label, action.next_state()));
                }
            }
        }
    }

    edges
}

/// Edges labelled `read / write, move`, e.g. `1 / 1, R`.
fn ntm_edges(ntm: &NtmDefinition) -> Vec<Edge> {
    let mut edges = Vec::new();

    for (source, by_read) in ntm.transitions() {
        for (read, actions) in by_read {
            for action in actions {
                let label = format!("{} / {}, {}", read, action.write(), action.movement());
                edges.push(Edge::new(source, label, action.next_state()));
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::AutomatonSpec;

    fn diagram(json: &str) -> Diagram {
        let automaton = serde_json::from_str::<AutomatonSpec>(json)
            .unwrap()
            .build()
            .unwrap();
        Diagram::from(&automaton)
    }

    fn labels(diagram: &Diagram) -> Vec<(&str, &str, &str)> {
        diagram
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.label.as_str(), e.destination.as_str()))
            .collect()
    }

    #[test]
    fn test_dfa_edges() {
        let diagram = diagram(
            r#"{
                "kind": "dfa",
                "states": ["q0", "q1"],
                "input_symbols": ["a", "b"],
                "transitions": {"q0": {"a": "q1"}, "q1": {"a": "q1", "b": "q0"}},
                "initial_state": "q0",
                "final_states": ["q1"]
            }"#,
        );

        assert_eq!(diagram.initial_state, "q0");
        assert!(diagram.final_states.contains("q1"));
        assert_eq!(
            labels(&diagram),
            vec![("q0", "a", "q1"), ("q1", "a", "q1"), ("q1", "b", "q0")]
        );
    }

    #[test]
    fn test_npda_edges_use_epsilon_label() {
        let diagram = diagram(
            r#"{
                "kind": "npda",
                "states": ["q0", "q1"],
                "input_symbols": ["a"],
                "stack_symbols": ["Z", "A"],
                "transitions": {"q0": {"a,Z": [["q0", "AZ"]], "A": [["q1", ""]]}},
                "initial_state": "q0",
                "initial_stack_symbol": "Z",
                "final_states": ["q1"]
            }"#,
        );

        assert_eq!(
            labels(&diagram),
            vec![("q0", "a, Z -> AZ", "q0"), ("q0", "ε, A -> ε", "q1")]
        );
    }

    #[test]
    fn test_ntm_edges() {
        let diagram = diagram(
            r#"{
                "kind": "ntm",
                "states": ["q0", "q1"],
                "input_symbols": ["1"],
                "tape_symbols": ["1", "_"],
                "transitions": {"q0": {"1": [["q0", "1", "R"]], "_": [["q1", "1", "N"]]}},
                "initial_state": "q0",
                "blank_symbol": "_",
                "final_states": ["q1"]
            }"#,
        );

        assert_eq!(
            labels(&diagram),
            vec![("q0", "1 / 1, R", "q0"), ("q0", "_ / 1, N", "q1")]
        );
        assert_eq!(diagram.states.len(), 2);
    }
}
